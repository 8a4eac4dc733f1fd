use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use fellowship_accounting::{
    datetime,
    summary::FinancialSummary,
    transactions::{self, NewTransaction, TransactionKind},
};
use fellowship_db::Connection;

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Finance {
    /// Income, spending and balance of a year
    #[clap(name="summary")]
    Summary(ShowSummary),
    /// Record a contribution, donation or expense
    #[clap(name="add")]
    Add(AddTransaction),
    /// Delete a contribution, donation or expense
    #[clap(name="delete")]
    Delete(DeleteTransaction),
}

impl Finance {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            Finance::Summary(cmd) => cmd.run(db).await,
            Finance::Add(cmd) => cmd.run(db).await,
            Finance::Delete(cmd) => cmd.run(db).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ShowSummary {
    #[clap(short, long, default_value_t=datetime::current_year())]
    pub year: i32,
    /// Print as JSON
    #[clap(long)]
    pub json: bool,
}

impl ShowSummary {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let summary = FinancialSummary::for_year(db, self.year).await?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            summary.print_formatted();
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddTransaction {
    /// contribution, donation or expense
    pub kind: TransactionKind,
    #[clap(short, long)]
    pub amount: f64,
    #[clap(short, long)]
    pub member_id: Option<i64>,
    #[clap(short, long)]
    pub description: Option<String>,
    /// Defaults to today
    #[clap(long)]
    pub date: Option<NaiveDate>,
}

impl AddTransaction {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let tx = NewTransaction {
            kind: self.kind,
            amount: self.amount,
            description: self.description,
            member_id: self.member_id,
            created_at: self.date.unwrap_or_else(datetime::today),
        };
        let recorded = transactions::record_transaction(db, tx).await?;
        println!("Transaction added successfully (id {}).", recorded.id());
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeleteTransaction {
    pub kind: TransactionKind,
    #[clap(short, long)]
    pub id: i64,
}

impl DeleteTransaction {
    pub async fn run(self, db: &Connection) -> Result<()> {
        transactions::delete_transaction(db, self.kind, self.id).await?;
        println!("Transaction deleted successfully.");
        Ok(())
    }
}

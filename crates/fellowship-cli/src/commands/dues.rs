use anyhow::Result;
use clap::{Args, Subcommand};

use fellowship_accounting::{datetime, dues};
use fellowship_db::Connection;

use crate::cli::Settings;
use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Dues {
    /// Show the dues record of a year
    #[clap(name="grid")]
    Grid(DuesGrid),
    /// Mark a month as paid, or unpaid if it was paid
    #[clap(name="toggle")]
    Toggle(ToggleDue),
}

impl Dues {
    pub async fn run(self, db: &Connection, settings: &Settings) -> Result<()> {
        match self {
            Dues::Grid(cmd) => cmd.run(db).await,
            Dues::Toggle(cmd) => cmd.run(db, settings).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct DuesGrid {
    #[clap(short, long, default_value_t=datetime::current_year())]
    pub year: i32,
}

impl DuesGrid {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let rows = dues::dues_grid(db, self.year).await?;
        println!("Monthly dues record {}", self.year);
        rows.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ToggleDue {
    #[clap(short, long)]
    pub member_id: i64,
    /// Month, 1 to 12
    #[clap(short='M', long)]
    pub month: u32,
    #[clap(short, long, default_value_t=datetime::current_year())]
    pub year: i32,
}

impl ToggleDue {
    pub async fn run(self, db: &Connection, settings: &Settings) -> Result<()> {
        let paid = dues::toggle_due(
            db, self.member_id, self.year, self.month, settings.due_amount,
        ).await?;
        let label = datetime::month_label(self.year, self.month);
        if paid {
            println!("Payment recorded for {}.", label);
        } else {
            println!("Payment record removed for {}.", label);
        }
        Ok(())
    }
}

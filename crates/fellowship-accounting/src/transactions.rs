use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use fellowship_data::{
    Contribution,
    Delete,
    Donation,
    Expense,
    Insert,
    Retrieve,
};

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    Contribution,
    Donation,
    Expense,
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contribution" | "contributions" => Ok(Self::Contribution),
            "donation" | "donations" => Ok(Self::Donation),
            "expense" | "expenses" => Ok(Self::Expense),
            other => Err(Error::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Contribution => "contribution",
            Self::Donation => "donation",
            Self::Expense => "expense",
        };
        write!(f, "{}", name)
    }
}

/// A transaction as entered, before it is recorded
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: f64,
    pub description: Option<String>,
    pub member_id: Option<i64>,
    pub created_at: NaiveDate,
}

impl NewTransaction {
    /// Amounts must be positive. Expenses need a description,
    /// contributions and donations a member.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidAmount);
        }
        match self.kind {
            TransactionKind::Expense => {
                let described = self.description
                    .as_deref()
                    .map_or(false, |d| !d.trim().is_empty());
                if !described {
                    return Err(Error::MissingDescription);
                }
            }
            TransactionKind::Contribution | TransactionKind::Donation => {
                if self.member_id.is_none() {
                    return Err(Error::MissingMember);
                }
            }
        }
        Ok(())
    }
}

/// A recorded transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Recorded {
    Contribution(Contribution),
    Donation(Donation),
    Expense(Expense),
}

impl Recorded {
    pub fn id(&self) -> i64 {
        match self {
            Self::Contribution(c) => c.id,
            Self::Donation(d) => d.id,
            Self::Expense(e) => e.id,
        }
    }
}

/// Validate and store a transaction
pub async fn record_transaction<DB>(db: &DB, tx: NewTransaction) -> Result<Recorded>
where
    DB: Insert<Contribution> + Insert<Donation> + Insert<Expense> + Sync,
{
    tx.validate()?;
    let description = tx.description.unwrap_or_default().trim().to_string();
    let member_id = tx.member_id.unwrap_or_default();

    let recorded = match tx.kind {
        TransactionKind::Contribution => Recorded::Contribution(
            db.insert(Contribution {
                member_id,
                amount: tx.amount,
                description,
                created_at: tx.created_at,
                ..Default::default()
            }).await?,
        ),
        TransactionKind::Donation => Recorded::Donation(
            db.insert(Donation {
                member_id,
                amount: tx.amount,
                created_at: tx.created_at,
                ..Default::default()
            }).await?,
        ),
        TransactionKind::Expense => Recorded::Expense(
            db.insert(Expense {
                amount: tx.amount,
                description,
                created_at: tx.created_at,
                ..Default::default()
            }).await?,
        ),
    };
    info!(kind = %tx.kind, id = recorded.id(), amount = tx.amount, "transaction recorded");
    Ok(recorded)
}

async fn delete_by_id<T, DB>(db: &DB, id: i64) -> Result<()>
where
    DB: Retrieve<T, Key = i64> + Delete<T> + Sync,
    T: Send,
{
    let item: T = db.retrieve(id).await?;
    db.delete(item).await
}

/// Delete a transaction. Fails if it does not exist.
pub async fn delete_transaction<DB>(db: &DB, kind: TransactionKind, id: i64) -> Result<()>
where
    DB: Retrieve<Contribution, Key = i64>
        + Retrieve<Donation, Key = i64>
        + Retrieve<Expense, Key = i64>
        + Delete<Contribution>
        + Delete<Donation>
        + Delete<Expense>
        + Sync,
{
    match kind {
        TransactionKind::Contribution => delete_by_id::<Contribution, _>(db, id).await?,
        TransactionKind::Donation => delete_by_id::<Donation, _>(db, id).await?,
        TransactionKind::Expense => delete_by_id::<Expense, _>(db, id).await?,
    }
    info!(kind = %kind, id, "transaction deleted");
    Ok(())
}

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use fellowship_data::{
    Delete,
    Insert,
    Member,
    MemberFilter,
    MonthlyDue,
    MonthlyDueFilter,
    Query,
    Retrieve,
};

use crate::Error;

/// Amount recorded for a month unless configured otherwise.
pub const DEFAULT_DUE_AMOUNT: f64 = 500.0;

/// One line of the dues record: a member and the
/// months paid in a year.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DuesRow {
    pub member: Member,
    /// Amount paid by month (1..=12)
    pub paid: BTreeMap<u32, f64>,
}

impl DuesRow {
    pub fn is_paid(&self, month: u32) -> bool {
        self.paid.contains_key(&month)
    }

    pub fn total(&self) -> f64 {
        self.paid.values().sum()
    }
}

/// Record the due of a month if it is not yet paid,
/// remove the record otherwise. Returns whether the
/// month is paid afterwards.
pub async fn toggle_due<DB>(
    db: &DB,
    member_id: i64,
    year: i32,
    month: u32,
    amount: f64,
) -> Result<bool>
where
    DB: Retrieve<Member, Key = i64>
        + Query<MonthlyDue, Filter = MonthlyDueFilter>
        + Insert<MonthlyDue>
        + Delete<MonthlyDue>
        + Sync,
{
    if !(1..=12).contains(&month) {
        return Err(Error::InvalidMonth(month).into());
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount.into());
    }
    let member: Member = db.retrieve(member_id).await?;

    let recorded = dues_for_month(db, member.id, year, month).await?;
    if recorded.is_empty() {
        db.insert(MonthlyDue {
            member_id: member.id,
            month,
            year,
            amount,
            ..Default::default()
        }).await?;
        info!(member = %member.name, year, month, "payment recorded");
        return Ok(true);
    }

    for due in recorded {
        db.delete(due).await?;
    }
    info!(member = %member.name, year, month, "payment record removed");
    Ok(false)
}

/// Dues recorded for a member in a single month
async fn dues_for_month<DB>(
    db: &DB,
    member_id: i64,
    year: i32,
    month: u32,
) -> Result<Vec<MonthlyDue>>
where
    DB: Query<MonthlyDue, Filter = MonthlyDueFilter> + Sync,
{
    db.query(&MonthlyDueFilter {
        member_id: Some(member_id),
        year: Some(year),
        month: Some(month),
        ..Default::default()
    }).await
}

/// The dues record of a year: every member, ordered by
/// name, with the months they paid.
pub async fn dues_grid<DB>(db: &DB, year: i32) -> Result<Vec<DuesRow>>
where
    DB: Query<Member, Filter = MemberFilter>
        + Query<MonthlyDue, Filter = MonthlyDueFilter>
        + Sync,
{
    let members: Vec<Member> = db.query(&MemberFilter::default()).await?;
    let dues: Vec<MonthlyDue> = db.query(&MonthlyDueFilter {
        year: Some(year),
        ..Default::default()
    }).await?;

    let mut by_member: HashMap<i64, BTreeMap<u32, f64>> = HashMap::new();
    for due in dues {
        by_member
            .entry(due.member_id)
            .or_default()
            .insert(due.month, due.amount);
    }

    let rows = members
        .into_iter()
        .map(|member| DuesRow {
            paid: by_member.remove(&member.id).unwrap_or_default(),
            member,
        })
        .collect();
    Ok(rows)
}

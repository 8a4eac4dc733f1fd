use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use fellowship_data::{
    Contribution,
    Donation,
    Expense,
    LedgerFilter,
    Member,
    MemberFilter,
    MonthlyDue,
    MonthlyDueFilter,
    Query,
};

/// A contribution, donation or expense as listed
/// in the summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub id: i64,
    /// Not set for expenses, or if the member is gone
    pub member_name: Option<String>,
    pub amount: f64,
    pub description: String,
    pub created_at: NaiveDate,
}

/// Income and spending of the department in a year
#[derive(Debug, Clone, Default, Serialize)]
pub struct FinancialSummary {
    pub year: i32,
    pub total_dues: f64,
    pub contributions: Vec<LedgerEntry>,
    pub donations: Vec<LedgerEntry>,
    pub expenses: Vec<LedgerEntry>,
}

fn sum(entries: &[LedgerEntry]) -> f64 {
    entries.iter().map(|e| e.amount).sum()
}

impl FinancialSummary {
    /// Collect dues of the year and all transactions dated
    /// within it, newest first.
    pub async fn for_year<DB>(db: &DB, year: i32) -> Result<Self>
    where
        DB: Query<Member, Filter = MemberFilter>
            + Query<MonthlyDue, Filter = MonthlyDueFilter>
            + Query<Contribution, Filter = LedgerFilter>
            + Query<Donation, Filter = LedgerFilter>
            + Query<Expense, Filter = LedgerFilter>
            + Sync,
    {
        let members: Vec<Member> = db.query(&MemberFilter::default()).await?;
        let names: HashMap<i64, String> = members
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();

        let dues: Vec<MonthlyDue> = db.query(&MonthlyDueFilter {
            year: Some(year),
            ..Default::default()
        }).await?;

        let filter = LedgerFilter::for_year(year);
        let contributions: Vec<Contribution> = db.query(&filter).await?;
        let donations: Vec<Donation> = db.query(&filter).await?;
        let expenses: Vec<Expense> = db.query(&filter).await?;

        Ok(Self {
            year,
            total_dues: dues.iter().map(|d| d.amount).sum(),
            contributions: contributions
                .into_iter()
                .map(|c| LedgerEntry {
                    id: c.id,
                    member_name: names.get(&c.member_id).cloned(),
                    amount: c.amount,
                    description: c.description,
                    created_at: c.created_at,
                })
                .collect(),
            donations: donations
                .into_iter()
                .map(|d| LedgerEntry {
                    id: d.id,
                    member_name: names.get(&d.member_id).cloned(),
                    amount: d.amount,
                    created_at: d.created_at,
                    ..Default::default()
                })
                .collect(),
            expenses: expenses
                .into_iter()
                .map(|e| LedgerEntry {
                    id: e.id,
                    member_name: None,
                    amount: e.amount,
                    description: e.description,
                    created_at: e.created_at,
                })
                .collect(),
        })
    }

    pub fn total_contributions(&self) -> f64 {
        sum(&self.contributions)
    }

    pub fn total_donations(&self) -> f64 {
        sum(&self.donations)
    }

    pub fn total_expenses(&self) -> f64 {
        sum(&self.expenses)
    }

    /// Dues, contributions and donations
    pub fn total_income(&self) -> f64 {
        self.total_dues + self.total_contributions() + self.total_donations()
    }

    pub fn net_balance(&self) -> f64 {
        self.total_income() - self.total_expenses()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use fellowship_data::Insert;
    use fellowship_db::Connection;

    use crate::dues::{toggle_due, DEFAULT_DUE_AMOUNT};
    use crate::roster::add_member;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_summary_totals() {
        let entry = |amount| LedgerEntry { amount, ..Default::default() };
        let summary = FinancialSummary {
            year: 2024,
            total_dues: 1500.0,
            contributions: vec![entry(500.0), entry(250.0)],
            donations: vec![entry(100.0)],
            expenses: vec![entry(2000.0)],
        };
        assert_eq!(summary.total_contributions(), 750.0);
        assert_eq!(summary.total_income(), 2350.0);
        assert_eq!(summary.total_expenses(), 2000.0);
        assert_eq!(summary.net_balance(), 350.0);
    }

    #[tokio::test]
    async fn test_summary_for_year() {
        let db = Connection::open_test().await.unwrap();
        let abraham = add_member(&db, "Abraham").await.unwrap();

        toggle_due(&db, abraham.id, 2024, 1, DEFAULT_DUE_AMOUNT).await.unwrap();
        toggle_due(&db, abraham.id, 2024, 2, DEFAULT_DUE_AMOUNT).await.unwrap();
        toggle_due(&db, abraham.id, 2023, 2, DEFAULT_DUE_AMOUNT).await.unwrap();

        db.insert(Contribution {
            member_id: abraham.id,
            amount: 500.0,
            description: "Building fund".to_string(),
            created_at: date(2024, 1, 10),
            ..Default::default()
        }).await.unwrap();
        db.insert(Contribution {
            member_id: abraham.id,
            amount: 9999.0,
            description: "Last year".to_string(),
            created_at: date(2023, 12, 31),
            ..Default::default()
        }).await.unwrap();
        db.insert(Donation {
            member_id: abraham.id,
            amount: 200.0,
            created_at: date(2024, 12, 31),
            ..Default::default()
        }).await.unwrap();
        db.insert(Expense {
            amount: 300.0,
            description: "Hymn books".to_string(),
            created_at: date(2024, 6, 1),
            ..Default::default()
        }).await.unwrap();

        let summary = FinancialSummary::for_year(&db, 2024).await.unwrap();
        assert_eq!(summary.total_dues, 1000.0);
        assert_eq!(summary.contributions.len(), 1);
        assert_eq!(summary.contributions[0].member_name.as_deref(), Some("Abraham"));
        assert_eq!(summary.donations.len(), 1);
        assert_eq!(summary.expenses[0].member_name, None);
        assert_eq!(summary.total_income(), 1700.0);
        assert_eq!(summary.net_balance(), 1400.0);
    }
}

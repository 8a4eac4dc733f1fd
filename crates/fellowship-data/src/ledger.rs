use chrono::NaiveDate;
use sqlx::FromRow;
use serde::{Serialize, Deserialize};

/// Filter for contributions, donations and expenses.
/// The date bounds are inclusive. `member_id` is ignored
/// for expenses.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LedgerFilter {
    pub id: Option<i64>,
    pub member_id: Option<i64>,
    pub created_after: Option<NaiveDate>,
    pub created_before: Option<NaiveDate>,
}

impl LedgerFilter {
    /// Everything recorded for a single member
    pub fn for_member(member_id: i64) -> Self {
        Self {
            member_id: Some(member_id),
            ..Default::default()
        }
    }

    /// Everything recorded between the first and the
    /// last day of a year.
    pub fn for_year(year: i32) -> Self {
        Self {
            created_after: NaiveDate::from_ymd_opt(year, 1, 1),
            created_before: NaiveDate::from_ymd_opt(year, 12, 31),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Contribution {
    pub id: i64,
    pub member_id: i64,
    pub amount: f64,
    pub description: String,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Donation {
    pub id: i64,
    pub member_id: i64,
    pub amount: f64,
    pub created_at: NaiveDate,
}

/// Department spending, not attributed to a member.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub amount: f64,
    pub description: String,
    pub created_at: NaiveDate,
}

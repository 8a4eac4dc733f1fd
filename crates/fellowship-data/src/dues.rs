use sqlx::FromRow;
use serde::{Serialize, Deserialize};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MonthlyDueFilter {
    pub id: Option<i64>,
    pub member_id: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// A recorded payment of a member for one month of a year.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MonthlyDue {
    pub id: i64,
    pub member_id: i64,
    pub month: u32,
    pub year: i32,
    pub amount: f64,
}

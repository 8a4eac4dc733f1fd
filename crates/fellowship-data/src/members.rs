use anyhow::Result;
use chrono::NaiveDate;
use sqlx::FromRow;
use serde::{Serialize, Deserialize};

use crate::{
    Contribution,
    Donation,
    LedgerFilter,
    MonthlyDue,
    MonthlyDueFilter,
    Query,
};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemberFilter {
    pub id: Option<i64>,
    /// Case insensitive substring of the name. Matched
    /// literally, wildcard characters have no meaning.
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub created_at: NaiveDate,
}

impl Member {

    /// Get the recorded monthly dues of a member
    pub async fn get_monthly_dues<DB>(
        &self,
        db: &DB,
    ) -> Result<Vec<MonthlyDue>>
    where
         DB: Query<MonthlyDue, Filter=MonthlyDueFilter>,
    {
        let dues = db.query(&MonthlyDueFilter{
            member_id: Some(self.id),
            ..Default::default()
        }).await?;
        Ok(dues)
    }

    pub async fn get_contributions<DB>(
        &self,
        db: &DB,
    ) -> Result<Vec<Contribution>>
    where
         DB: Query<Contribution, Filter=LedgerFilter>,
    {
        let contributions = db.query(&LedgerFilter::for_member(self.id)).await?;
        Ok(contributions)
    }

    pub async fn get_donations<DB>(
        &self,
        db: &DB,
    ) -> Result<Vec<Donation>>
    where
         DB: Query<Donation, Filter=LedgerFilter>,
    {
        let donations = db.query(&LedgerFilter::for_member(self.id)).await?;
        Ok(donations)
    }

    /// Names are compared without regard to case when
    /// looking for duplicates.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

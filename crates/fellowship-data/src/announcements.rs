use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use sqlx::FromRow;
use serde::{Serialize, Deserialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown priority {0}, expected low, medium or high")]
pub struct UnknownPriority(pub String);

/// How prominently an announcement is shown.
/// Orders from `Low` to `High`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(UnknownPriority(other.to_string())),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = UnknownPriority;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AnnouncementFilter {
    pub id: Option<i64>,
    pub is_pinned: Option<bool>,
}

/// A notice on the department's board
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub venue: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub sender_name: Option<String>,
    pub is_pinned: bool,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub created_at: NaiveDate,
}

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tracing::info;

use fellowship_data::{
    Announcement,
    Delete,
    Insert,
    Priority,
    Retrieve,
    Update,
};

use crate::Error;

/// The editable part of an announcement
#[derive(Debug, Clone, Default)]
pub struct Notice {
    pub title: String,
    pub content: String,
    pub venue: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub sender_name: Option<String>,
    pub is_pinned: bool,
    pub priority: Priority,
}

/// Blank optional fields are not stored.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Notice {
    /// Title and content are required. Text fields are
    /// trimmed.
    pub fn validate(self) -> Result<Self, Error> {
        let title = self.title.trim().to_string();
        let content = self.content.trim().to_string();
        if title.is_empty() || content.is_empty() {
            return Err(Error::MissingTitleOrContent);
        }
        Ok(Self {
            title,
            content,
            venue: non_blank(self.venue),
            sender_name: non_blank(self.sender_name),
            ..self
        })
    }

    fn apply(self, announcement: Announcement) -> Announcement {
        Announcement {
            title: self.title,
            content: self.content,
            venue: self.venue,
            event_date: self.event_date,
            sender_name: self.sender_name,
            is_pinned: self.is_pinned,
            priority: self.priority,
            ..announcement
        }
    }
}

impl From<Announcement> for Notice {
    fn from(a: Announcement) -> Self {
        Self {
            title: a.title,
            content: a.content,
            venue: a.venue,
            event_date: a.event_date,
            sender_name: a.sender_name,
            is_pinned: a.is_pinned,
            priority: a.priority,
        }
    }
}

/// Put a new announcement on the board, dated today.
pub async fn post_announcement<DB>(db: &DB, notice: Notice) -> Result<Announcement>
where
    DB: Insert<Announcement> + Sync,
{
    let notice = notice.validate()?;
    let announcement = db.insert(notice.apply(Announcement {
        created_at: Utc::now().date_naive(),
        ..Default::default()
    })).await?;
    info!(id = announcement.id, title = %announcement.title, "announcement posted");
    Ok(announcement)
}

/// Replace the contents of an announcement. The date it
/// was posted is kept.
pub async fn edit_announcement<DB>(db: &DB, id: i64, notice: Notice) -> Result<Announcement>
where
    DB: Retrieve<Announcement, Key = i64> + Update<Announcement> + Sync,
{
    let notice = notice.validate()?;
    let current: Announcement = db.retrieve(id).await?;
    let announcement = db.update(notice.apply(current)).await?;
    info!(id = announcement.id, title = %announcement.title, "announcement updated");
    Ok(announcement)
}

/// Take an announcement off the board. Returns the removed
/// announcement.
pub async fn delete_announcement<DB>(db: &DB, id: i64) -> Result<Announcement>
where
    DB: Retrieve<Announcement, Key = i64> + Delete<Announcement> + Sync,
{
    let announcement: Announcement = db.retrieve(id).await?;
    db.delete(announcement.clone()).await?;
    info!(id = announcement.id, "announcement deleted");
    Ok(announcement)
}

#[cfg(test)]
mod tests {
    use super::*;

    use fellowship_db::Connection;

    fn notice(title: &str, content: &str) -> Notice {
        Notice {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_requires_title_and_content() {
        for (title, content) in [("", "Body"), ("Title", "  "), (" ", "\n")] {
            assert_eq!(
                notice(title, content).validate().unwrap_err(),
                Error::MissingTitleOrContent,
            );
        }
    }

    #[test]
    fn test_validate_trims_fields() {
        let valid = Notice {
            venue: Some("  ".to_string()),
            sender_name: Some(" Pastor Ade ".to_string()),
            ..notice(" Retreat ", " Bring a bible ")
        }.validate().unwrap();
        assert_eq!(valid.title, "Retreat");
        assert_eq!(valid.content, "Bring a bible");
        assert_eq!(valid.venue, None);
        assert_eq!(valid.sender_name.as_deref(), Some("Pastor Ade"));
    }

    #[tokio::test]
    async fn test_post_edit_delete() {
        let db = Connection::open_test().await.unwrap();
        let posted = post_announcement(&db, notice("Retreat", "Friday")).await.unwrap();
        assert_eq!(posted.priority, Priority::Medium);
        assert!(!posted.is_pinned);
        assert_eq!(posted.created_at, Utc::now().date_naive());

        let edited = edit_announcement(&db, posted.id, Notice {
            is_pinned: true,
            priority: Priority::High,
            ..notice("Retreat moved", "Saturday")
        }).await.unwrap();
        assert_eq!(edited.id, posted.id);
        assert_eq!(edited.title, "Retreat moved");
        assert!(edited.is_pinned);
        assert_eq!(edited.created_at, posted.created_at);

        let err = edit_announcement(&db, posted.id, notice("", "Saturday"))
            .await
            .unwrap_err()
            .downcast::<Error>()
            .unwrap();
        assert_eq!(err, Error::MissingTitleOrContent);

        delete_announcement(&db, posted.id).await.unwrap();
        assert!(delete_announcement(&db, posted.id).await.is_err());
    }
}

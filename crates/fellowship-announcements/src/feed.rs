use std::cmp::Reverse;

use anyhow::Result;
use serde::Serialize;

use fellowship_data::{Announcement, AnnouncementFilter, Query};

use crate::Error;

/// Announcements shown per page
pub const PAGE_SIZE: usize = 3;

/// Pinned announcements first, then by priority, newest first
/// within the same priority.
pub fn sort_feed(announcements: &mut [Announcement]) {
    announcements.sort_by_key(|a| Reverse((a.is_pinned, a.priority, a.created_at, a.id)));
}

/// One page of the feed. Pages are counted from 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedPage {
    pub page: usize,
    pub total_pages: usize,
    pub announcements: Vec<Announcement>,
}

impl FeedPage {
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }
}

/// Cut a sorted feed into pages of `page_size`. An empty feed
/// has a single, empty page 0.
pub fn paginate(
    announcements: Vec<Announcement>,
    page: usize,
    page_size: usize,
) -> Result<FeedPage, Error> {
    let page_size = page_size.max(1);
    let total_pages = announcements.len().div_ceil(page_size);
    if page > 0 && page >= total_pages {
        return Err(Error::PageOutOfRange {
            page,
            total: total_pages,
        });
    }
    let announcements = announcements
        .into_iter()
        .skip(page * page_size)
        .take(page_size)
        .collect();
    Ok(FeedPage {
        page,
        total_pages,
        announcements,
    })
}

/// Read a page of the announcement feed.
pub async fn feed_page<DB>(db: &DB, page: usize) -> Result<FeedPage>
where
    DB: Query<Announcement, Filter = AnnouncementFilter> + Sync,
{
    let mut announcements: Vec<Announcement> =
        db.query(&AnnouncementFilter::default()).await?;
    sort_feed(&mut announcements);
    Ok(paginate(announcements, page, PAGE_SIZE)?)
}

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use inquire::Confirm;

use fellowship_announcements::{
    board::{self, Notice},
    feed,
};
use fellowship_data::{Announcement, Priority, Retrieve};
use fellowship_db::Connection;

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Announcements {
    /// Show a page of the announcement feed
    #[clap(name="list")]
    List(ListAnnouncements),
    /// Post an announcement
    #[clap(name="add")]
    Add(AddAnnouncement),
    /// Change an announcement
    #[clap(name="edit")]
    Edit(EditAnnouncement),
    /// Remove an announcement
    #[clap(name="delete")]
    Delete(DeleteAnnouncement),
}

impl Announcements {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            Announcements::List(cmd) => cmd.run(db).await,
            Announcements::Add(cmd) => cmd.run(db).await,
            Announcements::Edit(cmd) => cmd.run(db).await,
            Announcements::Delete(cmd) => cmd.run(db).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListAnnouncements {
    /// Page to show, starting at 1
    #[clap(short, long, default_value_t = 1)]
    pub page: usize,
}

impl ListAnnouncements {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let page = feed::feed_page(db, self.page.saturating_sub(1)).await?;
        page.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddAnnouncement {
    #[clap(short, long)]
    pub title: String,
    #[clap(short, long)]
    pub content: String,
    #[clap(long)]
    pub venue: Option<String>,
    #[clap(long)]
    pub event_date: Option<NaiveDate>,
    /// Name shown as the sender
    #[clap(long)]
    pub sender: Option<String>,
    /// Keep on top of the feed
    #[clap(long)]
    pub pinned: bool,
    /// low, medium or high
    #[clap(long, default_value = "medium")]
    pub priority: Priority,
}

impl AddAnnouncement {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let announcement = board::post_announcement(db, Notice {
            title: self.title,
            content: self.content,
            venue: self.venue,
            event_date: self.event_date,
            sender_name: self.sender,
            is_pinned: self.pinned,
            priority: self.priority,
        }).await?;
        println!("Announcement posted with id {}.", announcement.id);
        Ok(())
    }
}

/// Only the given fields are changed
#[derive(Args, Debug)]
pub struct EditAnnouncement {
    #[clap(short, long)]
    pub id: i64,
    #[clap(short, long)]
    pub title: Option<String>,
    #[clap(short, long)]
    pub content: Option<String>,
    #[clap(long)]
    pub venue: Option<String>,
    #[clap(long)]
    pub event_date: Option<NaiveDate>,
    #[clap(long)]
    pub sender: Option<String>,
    #[clap(long)]
    pub pinned: Option<bool>,
    #[clap(long)]
    pub priority: Option<Priority>,
}

impl EditAnnouncement {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let current: Announcement = db.retrieve(self.id).await?;
        let mut notice = Notice::from(current);
        if let Some(title) = self.title {
            notice.title = title;
        }
        if let Some(content) = self.content {
            notice.content = content;
        }
        if self.venue.is_some() {
            notice.venue = self.venue;
        }
        if self.event_date.is_some() {
            notice.event_date = self.event_date;
        }
        if self.sender.is_some() {
            notice.sender_name = self.sender;
        }
        notice.is_pinned = self.pinned.unwrap_or(notice.is_pinned);
        notice.priority = self.priority.unwrap_or(notice.priority);

        let announcement = board::edit_announcement(db, self.id, notice).await?;
        announcement.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeleteAnnouncement {
    #[clap(short, long)]
    pub id: i64,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

impl DeleteAnnouncement {
    pub async fn run(&self, db: &Connection) -> Result<()> {
        let announcement: Announcement = db.retrieve(self.id).await?;
        announcement.print_formatted();
        println!("");
        if !self.yes {
            let confirm = Confirm::new("Delete this announcement?")
                .with_default(false);
            if !confirm.prompt()? {
                return Ok(());
            }
        }
        board::delete_announcement(db, announcement.id).await?;
        println!("Announcement deleted.");
        Ok(())
    }
}

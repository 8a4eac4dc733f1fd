use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use fellowship_data::{
    Announcement,
    AnnouncementFilter,
    Delete,
    Insert,
    Query,
    Retrieve,
    Update,
};

use crate::{
    results::{Id, QueryError},
    Connection,
};

#[async_trait]
impl Query<Announcement> for Connection {
    type Filter = AnnouncementFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Announcement>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                id,
                title,
                content,
                venue,
                event_date,
                sender_name,
                is_pinned,
                priority,
                created_at
            FROM announcements
            WHERE 1
            "#,
        );
        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(is_pinned) = filter.is_pinned {
            qry.push(" AND is_pinned = ").push_bind(is_pinned);
        }
        qry.push(" ORDER BY id");

        let announcements: Vec<Announcement> =
            qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(announcements)
    }
}

#[async_trait]
impl Retrieve<Announcement> for Connection {
    type Key = i64;
    async fn retrieve(&self, id: Self::Key) -> Result<Announcement> {
        let announcement: Announcement = self.query(&AnnouncementFilter {
                id: Some(id),
                ..Default::default()
            })
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(announcement)
    }
}

#[async_trait]
impl Insert<Announcement> for Connection {
    async fn insert(&self, announcement: Announcement) -> Result<Announcement> {
        let insert: Id<i64> = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO announcements (
                    title,
                    content,
                    venue,
                    event_date,
                    sender_name,
                    is_pinned,
                    priority,
                    created_at
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(&announcement.title)
                .push_bind(&announcement.content)
                .push_bind(&announcement.venue)
                .push_bind(announcement.event_date)
                .push_bind(&announcement.sender_name)
                .push_bind(announcement.is_pinned)
                .push_bind(announcement.priority.to_string())
                .push_bind(announcement.created_at);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Update<Announcement> for Connection {
    /// Update everything but the creation date
    async fn update(&self, announcement: Announcement) -> Result<Announcement> {
        {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new("UPDATE announcements SET ");
            qry.push("title = ").push_bind(&announcement.title)
                .push(", content = ").push_bind(&announcement.content)
                .push(", venue = ").push_bind(&announcement.venue)
                .push(", event_date = ").push_bind(announcement.event_date)
                .push(", sender_name = ").push_bind(&announcement.sender_name)
                .push(", is_pinned = ").push_bind(announcement.is_pinned)
                .push(", priority = ").push_bind(announcement.priority.to_string())
                .push(" WHERE id = ").push_bind(announcement.id);
            qry.build()
                .execute(&mut *conn)
                .await?;
        }
        self.retrieve(announcement.id).await
    }
}

#[async_trait]
impl Delete<Announcement> for Connection {
    async fn delete(&self, announcement: Announcement) -> Result<()> {
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new("DELETE FROM announcements WHERE id = ")
            .push_bind(announcement.id)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

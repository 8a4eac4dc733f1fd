use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use fellowship_data::{
    Delete,
    Update,
    Insert,
    Query,
    Retrieve,
    Member,
    MemberFilter,
};

use crate::{
    results::{Id, QueryError},
    Connection,
};

/// Case folded form of a name, stored next to it for matching.
fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

#[async_trait]
impl Query<Member> for Connection {
    type Filter = MemberFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Member>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                id,
                name,
                created_at
            FROM members
            WHERE 1
            "#,
        );

        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        // instr instead of LIKE: the term must not act as a pattern.
        // SQLite's lower() only folds ASCII, so both sides are
        // folded here.
        if let Some(name) = filter.name.as_deref() {
            qry.push(" AND instr(name_folded, ")
                .push_bind(fold_name(name))
                .push(") > 0");
        }
        qry.push(" ORDER BY name_folded, id");

        let members: Vec<Member> = qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(members)
    }
}

#[async_trait]
impl Retrieve<Member> for Connection {
    type Key = i64;
    async fn retrieve(&self, member_id: Self::Key) -> Result<Member> {
        let filter = MemberFilter {
            id: Some(member_id),
            ..Default::default()
        };
        let member: Member = self
            .query(&filter)
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(member)
    }
}

#[async_trait]
impl Insert<Member> for Connection {
    async fn insert(&self, member: Member) -> Result<Member> {
        let insert: Id<i64> = {
            let mut conn = self.lock().await;
            QueryBuilder::<Sqlite>::new("INSERT INTO members (name, name_folded) VALUES (")
                .push_bind(&member.name)
                .push(", ")
                .push_bind(fold_name(&member.name))
                .push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}


#[async_trait]
impl Update<Member> for Connection {
    /// Update member
    async fn update(&self, member: Member) -> Result<Member> {
        {
            let mut conn = self.lock().await;
            QueryBuilder::<Sqlite>::new("UPDATE members SET")
                .push(" name = ")
                .push_bind(&member.name)
                .push(", name_folded = ")
                .push_bind(fold_name(&member.name))
                .push(" WHERE id = ")
                .push_bind(member.id)
                .build()
                .execute(&mut *conn)
                .await?;
        }
        self.retrieve(member.id).await
    }
}

#[async_trait]
impl Delete<Member> for Connection {
    /// Delete member, recorded dues, contributions and
    /// donations go with it.
    async fn delete(&self, member: Member) -> Result<()> {
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new("DELETE FROM members WHERE id = ")
            .push_bind(member.id)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

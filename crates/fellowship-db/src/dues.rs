use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use fellowship_data::{
    Delete,
    Insert,
    MonthlyDue,
    MonthlyDueFilter,
    Query,
    Retrieve,
};

use crate::{
    results::{Id, QueryError},
    Connection,
};

#[async_trait]
impl Query<MonthlyDue> for Connection {
    type Filter = MonthlyDueFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<MonthlyDue>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                id,
                member_id,
                month,
                year,
                ROUND(amount, 10) AS amount
            FROM monthly_dues
            WHERE 1
            "#,
        );
        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(member_id) = filter.member_id {
            qry.push(" AND member_id = ").push_bind(member_id);
        }
        if let Some(year) = filter.year {
            qry.push(" AND year = ").push_bind(year);
        }
        if let Some(month) = filter.month {
            qry.push(" AND month = ").push_bind(month);
        }
        qry.push(" ORDER BY year, month");

        let dues: Vec<MonthlyDue> = qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(dues)
    }
}

#[async_trait]
impl Retrieve<MonthlyDue> for Connection {
    type Key = i64;
    async fn retrieve(&self, id: Self::Key) -> Result<MonthlyDue> {
        let due: MonthlyDue = self.query(&MonthlyDueFilter {
                id: Some(id),
                ..Default::default()
            })
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(due)
    }
}

#[async_trait]
impl Insert<MonthlyDue> for Connection {
    async fn insert(&self, due: MonthlyDue) -> Result<MonthlyDue> {
        let insert: Id<i64> = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO monthly_dues (
                    member_id,
                    month,
                    year,
                    amount
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(due.member_id)
                .push_bind(due.month)
                .push_bind(due.year)
                .push_bind(due.amount);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Delete<MonthlyDue> for Connection {
    async fn delete(&self, due: MonthlyDue) -> Result<()> {
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new("DELETE FROM monthly_dues WHERE id = ")
            .push_bind(due.id)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use fellowship_data::Member;

    #[tokio::test]
    async fn test_monthly_due_insert_and_filter() {
        let db = Connection::open_test().await.unwrap();
        let m = db.insert(Member {
            name: "Testmember".to_string(),
            ..Default::default()
        }).await.unwrap();

        let due = db.insert(MonthlyDue {
            member_id: m.id,
            month: 3,
            year: 2023,
            amount: 500.0,
            ..Default::default()
        }).await.unwrap();
        assert!(due.id > 0);
        assert_eq!(due.month, 3);
        assert_eq!(due.year, 2023);
        assert_eq!(due.amount, 500.0);

        db.insert(MonthlyDue {
            member_id: m.id,
            month: 3,
            year: 2024,
            amount: 500.0,
            ..Default::default()
        }).await.unwrap();

        let dues: Vec<MonthlyDue> = db.query(&MonthlyDueFilter {
            year: Some(2024),
            ..Default::default()
        }).await.unwrap();
        assert_eq!(dues.len(), 1);
        assert_eq!(dues[0].year, 2024);
    }

    #[tokio::test]
    async fn test_monthly_due_is_unique_per_month() {
        let db = Connection::open_test().await.unwrap();
        let m = db.insert(Member {
            name: "Testmember".to_string(),
            ..Default::default()
        }).await.unwrap();
        let due = MonthlyDue {
            member_id: m.id,
            month: 7,
            year: 2024,
            amount: 500.0,
            ..Default::default()
        };
        db.insert(due.clone()).await.unwrap();
        assert!(db.insert(due).await.is_err());
    }

    #[tokio::test]
    async fn test_monthly_due_rejects_invalid_month() {
        let db = Connection::open_test().await.unwrap();
        let m = db.insert(Member {
            name: "Testmember".to_string(),
            ..Default::default()
        }).await.unwrap();
        let result = db.insert(MonthlyDue {
            member_id: m.id,
            month: 13,
            year: 2024,
            amount: 500.0,
            ..Default::default()
        }).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_monthly_due_delete() {
        let db = Connection::open_test().await.unwrap();
        let m = db.insert(Member {
            name: "Testmember".to_string(),
            ..Default::default()
        }).await.unwrap();
        let due = db.insert(MonthlyDue {
            member_id: m.id,
            month: 1,
            year: 2024,
            amount: 500.0,
            ..Default::default()
        }).await.unwrap();

        db.delete(due.clone()).await.unwrap();
        let result: Result<MonthlyDue> = db.retrieve(due.id).await;
        assert!(result.is_err());
    }
}

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use fellowship_data::{
    Contribution,
    Delete,
    Donation,
    Expense,
    Insert,
    LedgerFilter,
    Query,
    Retrieve,
};

use crate::{
    results::{Id, QueryError},
    Connection,
};

/// Append the filter conditions shared by all ledger tables.
fn push_filter(
    qry: &mut QueryBuilder<'_, Sqlite>,
    filter: &LedgerFilter,
    with_member: bool,
) {
    if let Some(id) = filter.id {
        qry.push(" AND id = ").push_bind(id);
    }
    if with_member {
        if let Some(member_id) = filter.member_id {
            qry.push(" AND member_id = ").push_bind(member_id);
        }
    }
    if let Some(after) = filter.created_after {
        qry.push(" AND created_at >= ").push_bind(after);
    }
    if let Some(before) = filter.created_before {
        qry.push(" AND created_at <= ").push_bind(before);
    }
    qry.push(" ORDER BY created_at DESC, id DESC");
}

/// Delete a single row of a ledger table.
async fn delete_row(db: &Connection, table: &str, id: i64) -> Result<()> {
    let mut conn = db.lock().await;
    QueryBuilder::<Sqlite>::new(format!("DELETE FROM {table} WHERE id = "))
        .push_bind(id)
        .build()
        .execute(&mut *conn)
        .await?;
    Ok(())
}

// Contributions

#[async_trait]
impl Query<Contribution> for Connection {
    type Filter = LedgerFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Contribution>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                id,
                member_id,
                ROUND(amount, 10) AS amount,
                description,
                created_at
            FROM contributions
            WHERE 1
            "#,
        );
        push_filter(&mut qry, filter, true);
        let contributions: Vec<Contribution> =
            qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(contributions)
    }
}

#[async_trait]
impl Retrieve<Contribution> for Connection {
    type Key = i64;
    async fn retrieve(&self, id: Self::Key) -> Result<Contribution> {
        let contribution: Contribution = self.query(&LedgerFilter {
                id: Some(id),
                ..Default::default()
            })
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(contribution)
    }
}

#[async_trait]
impl Insert<Contribution> for Connection {
    async fn insert(&self, contribution: Contribution) -> Result<Contribution> {
        let insert: Id<i64> = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO contributions (
                    member_id,
                    amount,
                    description,
                    created_at
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(contribution.member_id)
                .push_bind(contribution.amount)
                .push_bind(&contribution.description)
                .push_bind(contribution.created_at);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Delete<Contribution> for Connection {
    async fn delete(&self, contribution: Contribution) -> Result<()> {
        delete_row(self, "contributions", contribution.id).await
    }
}

// Donations

#[async_trait]
impl Query<Donation> for Connection {
    type Filter = LedgerFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Donation>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                id,
                member_id,
                ROUND(amount, 10) AS amount,
                created_at
            FROM donations
            WHERE 1
            "#,
        );
        push_filter(&mut qry, filter, true);
        let donations: Vec<Donation> =
            qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(donations)
    }
}

#[async_trait]
impl Retrieve<Donation> for Connection {
    type Key = i64;
    async fn retrieve(&self, id: Self::Key) -> Result<Donation> {
        let donation: Donation = self.query(&LedgerFilter {
                id: Some(id),
                ..Default::default()
            })
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(donation)
    }
}

#[async_trait]
impl Insert<Donation> for Connection {
    async fn insert(&self, donation: Donation) -> Result<Donation> {
        let insert: Id<i64> = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO donations (
                    member_id,
                    amount,
                    created_at
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(donation.member_id)
                .push_bind(donation.amount)
                .push_bind(donation.created_at);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Delete<Donation> for Connection {
    async fn delete(&self, donation: Donation) -> Result<()> {
        delete_row(self, "donations", donation.id).await
    }
}

// Expenses

#[async_trait]
impl Query<Expense> for Connection {
    type Filter = LedgerFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Expense>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                id,
                ROUND(amount, 10) AS amount,
                description,
                created_at
            FROM expenses
            WHERE 1
            "#,
        );
        push_filter(&mut qry, filter, false);
        let expenses: Vec<Expense> =
            qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(expenses)
    }
}

#[async_trait]
impl Retrieve<Expense> for Connection {
    type Key = i64;
    async fn retrieve(&self, id: Self::Key) -> Result<Expense> {
        let expense: Expense = self.query(&LedgerFilter {
                id: Some(id),
                ..Default::default()
            })
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(expense)
    }
}

#[async_trait]
impl Insert<Expense> for Connection {
    async fn insert(&self, expense: Expense) -> Result<Expense> {
        let insert: Id<i64> = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO expenses (
                    amount,
                    description,
                    created_at
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(expense.amount)
                .push_bind(&expense.description)
                .push_bind(expense.created_at);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Delete<Expense> for Connection {
    async fn delete(&self, expense: Expense) -> Result<()> {
        delete_row(self, "expenses", expense.id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    use fellowship_data::Member;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_contribution_insert() {
        let db = Connection::open_test().await.unwrap();
        let m = db.insert(Member {
            name: "Testmember".to_string(),
            ..Default::default()
        }).await.unwrap();

        let tx = db.insert(Contribution {
            member_id: m.id,
            amount: 500.0,
            description: "Building fund".to_string(),
            created_at: date(2024, 1, 10),
            ..Default::default()
        }).await.unwrap();
        assert!(tx.id > 0);
        assert_eq!(tx.member_id, m.id);
        assert_eq!(tx.amount, 500.0);
        assert_eq!(tx.description, "Building fund");
        assert_eq!(tx.created_at, date(2024, 1, 10));
    }

    #[tokio::test]
    async fn test_ledger_filter_by_member_and_year() {
        let db = Connection::open_test().await.unwrap();
        let m1 = db.insert(Member {
            name: "Testmember1".to_string(),
            ..Default::default()
        }).await.unwrap();
        let m2 = db.insert(Member {
            name: "Testmember2".to_string(),
            ..Default::default()
        }).await.unwrap();

        for (member_id, created_at) in [
            (m1.id, date(2023, 12, 31)),
            (m1.id, date(2024, 1, 1)),
            (m2.id, date(2024, 12, 31)),
        ] {
            db.insert(Donation {
                member_id,
                amount: 100.0,
                created_at,
                ..Default::default()
            }).await.unwrap();
        }

        let donations: Vec<Donation> =
            db.query(&LedgerFilter::for_member(m1.id)).await.unwrap();
        assert_eq!(donations.len(), 2);

        let donations: Vec<Donation> =
            db.query(&LedgerFilter::for_year(2024)).await.unwrap();
        assert_eq!(donations.len(), 2);
        // Newest first
        assert_eq!(donations[0].created_at, date(2024, 12, 31));
        assert_eq!(donations[1].created_at, date(2024, 1, 1));
    }

    #[tokio::test]
    async fn test_expense_insert_and_delete() {
        let db = Connection::open_test().await.unwrap();
        let expense = db.insert(Expense {
            amount: 1500.0,
            description: "Chairs".to_string(),
            created_at: date(2024, 5, 2),
            ..Default::default()
        }).await.unwrap();

        let expenses: Vec<Expense> =
            db.query(&LedgerFilter::for_year(2024)).await.unwrap();
        assert_eq!(expenses, vec![expense.clone()]);

        db.delete(expense.clone()).await.unwrap();
        let result: Result<Expense> = db.retrieve(expense.id).await;
        assert!(result.is_err());
    }
}

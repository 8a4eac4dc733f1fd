use anyhow::Result;
use tracing::info;

use crate::Connection;

/// Install the database schema.
pub async fn install(conn: &Connection) -> Result<()> {
    let mut conn = conn.lock().await;
    let schema_data = include_str!("../db/schema.sql");
    info!("installing database schema");
    sqlx::raw_sql(schema_data).execute(&mut *conn).await?;
    Ok(())
}

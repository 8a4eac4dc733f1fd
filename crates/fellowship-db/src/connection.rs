use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection},
    Connection as SqlConnection,
};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::schema;


/// A thread safe connection to the database
#[derive(Clone)]
pub struct Connection {
    conn: Arc<Mutex<SqliteConnection>>,
    _test_handle: Option<Arc<TestHandle>>,
}

impl Connection {
    /// Open a connection to an existing database
    pub async fn open(filename: impl AsRef<Path>) -> Result<Self> {
        let opts = SqliteConnectOptions::new()
            .filename(filename.as_ref())
            .foreign_keys(true);
        Self::connect(opts, None).await
    }

    /// Open a connection, creating the database file
    /// if it does not exist yet.
    pub async fn create(filename: impl AsRef<Path>) -> Result<Self> {
        let opts = SqliteConnectOptions::new()
            .filename(filename.as_ref())
            .create_if_missing(true)
            .foreign_keys(true);
        Self::connect(opts, None).await
    }

    /// Open a new test database connection.
    /// The database will be created on each open and
    /// removed when the last clone of the connection is dropped.
    pub async fn open_test() -> Result<Self> {
        let path = std::env::temp_dir().join(
            format!("fellowship_test_{}.sqlite3", rand::random::<u64>()));
        let handle = Arc::new(TestHandle { path: path.clone() });
        let opts = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .foreign_keys(true);
        let conn = Self::connect(opts, Some(handle)).await?;

        // Install the schema
        schema::install(&conn).await?;

        Ok(conn)
    }

    async fn connect(
        opts: SqliteConnectOptions,
        test_handle: Option<Arc<TestHandle>>,
    ) -> Result<Self> {
        debug!(filename = ?opts.get_filename(), "opening database");
        let conn = SqliteConnection::connect_with(&opts).await?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            _test_handle: test_handle,
        })
    }

    /// Acquire the underlying connection. Concurrent
    /// queries are serialized here.
    pub async fn lock(&self) -> MutexGuard<'_, SqliteConnection> {
        self.conn.lock().await
    }
}

struct TestHandle {
    path: PathBuf,
}

impl Drop for TestHandle {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

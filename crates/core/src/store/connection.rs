//! Database connection management with pragma configuration.
//!
//! Opens the SQLite database at an explicit location, applies the pragmas
//! every connection needs (WAL, foreign keys), runs migrations, and hands
//! out exclusive access to the connection one operation at a time.

use super::migrations;
use crate::Error;
use std::path::Path;
use tokio_rusqlite::{Connection, rusqlite};

/// Pragmas applied right after the connection is acquired.
///
/// `foreign_keys` is per-connection state in SQLite, so it cannot live in the
/// schema and must be switched on here.
const CONNECTION_PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

/// Shelf database handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations on a
/// background thread. Clones share that thread, so operations submitted from
/// concurrent tasks run one after another and never interleave.
#[derive(Clone, Debug)]
pub struct ShelfDb {
    conn: Connection,
}

impl ShelfDb {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies connection pragmas,
    /// and runs any pending migrations. Opening an already initialized
    /// database is a no-op beyond the pragmas.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening shelf database");
        let conn = Connection::open(path)
            .await
            .map_err(|e| Error::StorageUnavailable(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory database.
    ///
    /// Every call yields an independent database, which keeps tests isolated.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::StorageUnavailable(e.into()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| conn.execute_batch(CONNECTION_PRAGMAS))
            .await
            .map_err(Error::from)?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }

    /// Run `operation` with exclusive access to the connection.
    ///
    /// The connection is borrowed for exactly the duration of the closure and
    /// is handed back on every exit path. Multi-statement writes should open a
    /// transaction inside the closure: an uncommitted transaction is rolled
    /// back when it is dropped, so an early `?` leaves no partial state.
    pub async fn with_connection<F, T>(&self, operation: F) -> Result<T, Error>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<T, Error> + Send + 'static,
        T: Send + 'static,
    {
        self.conn.call(operation).await.map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = ShelfDb::open_in_memory().await.unwrap();
        let version = db
            .with_connection(|conn| {
                Ok(conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0))?)
            })
            .await
            .unwrap();
        assert!(!version.is_empty());
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let db = ShelfDb::open_in_memory().await.unwrap();
        let enabled: i64 = db
            .with_connection(|conn| Ok(conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?))
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_reopen_file_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelf.sqlite");

        let first = ShelfDb::open(&path).await.unwrap();
        drop(first);
        let second = ShelfDb::open(&path).await.unwrap();

        let tables: i64 = second
            .with_connection(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master
                     WHERE type = 'table' AND name IN ('search_cache', 'books', 'book_statuses')",
                    [],
                    |row| row.get(0),
                )?)
            })
            .await
            .unwrap();
        assert_eq!(tables, 3);
    }

    #[tokio::test]
    async fn test_instances_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let a = ShelfDb::open(dir.path().join("a.sqlite")).await.unwrap();
        let b = ShelfDb::open(dir.path().join("b.sqlite")).await.unwrap();

        a.with_connection(|conn| {
            conn.execute(
                "INSERT INTO search_cache (query_hash, query, page, page_size, payload, created_at, expires_at)
                 VALUES ('h', 'q', 1, 10, '{}', '2000-01-01T00:00:00.000000Z', '2999-01-01T00:00:00.000000Z')",
                [],
            )?;
            Ok(())
        })
        .await
        .unwrap();

        let count_in_b: i64 = b
            .with_connection(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM search_cache", [], |row| row.get(0))?))
            .await
            .unwrap();
        assert_eq!(count_in_b, 0);
    }

    #[tokio::test]
    async fn test_failed_operation_releases_connection() {
        let db = ShelfDb::open_in_memory().await.unwrap();
        let result: Result<(), Error> = db
            .with_connection(|_conn| Err(Error::Validation("boom".into())))
            .await;
        assert!(matches!(result, Err(Error::Validation(_))));

        let one: i64 = db
            .with_connection(|conn| Ok(conn.query_row("SELECT 1", [], |row| row.get(0))?))
            .await
            .unwrap();
        assert_eq!(one, 1);
    }
}

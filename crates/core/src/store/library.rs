//! Book status tracking.
//!
//! A book row exists exactly as long as its status row: `set_status` writes
//! both, `delete_status` removes both in one transaction. Every operation runs
//! inside a single `with_connection` scope.

use std::collections::{BTreeSet, HashMap};

use super::connection::ShelfDb;
use super::status::{BOOK_ROW_COLUMNS, BookMetadata, BookRow, ReadingStatus, StatusCounts, TrackedBook, encode_authors};
use super::timestamp;
use crate::Error;
use tokio_rusqlite::{params, rusqlite};

/// Upper bound on keys bound into one `IN (...)` list.
///
/// Stays under SQLITE_MAX_VARIABLE_NUMBER on older SQLite builds (999).
const BATCH_CHUNK_SIZE: usize = 500;

fn select_joined(filter: &str) -> String {
    format!(
        "SELECT {BOOK_ROW_COLUMNS}
         FROM books b JOIN book_statuses s ON s.book_id = b.id
         {filter}"
    )
}

fn query_one(conn: &rusqlite::Connection, external_key: &str) -> Result<Option<TrackedBook>, Error> {
    let result = conn.query_row(
        &select_joined("WHERE b.external_key = ?1"),
        params![external_key],
        BookRow::from_row,
    );

    match result {
        Ok(row) => Ok(Some(row.try_into()?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn query_many(conn: &rusqlite::Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<TrackedBook>, Error> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, BookRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(TrackedBook::try_from).collect()
}

impl ShelfDb {
    /// Get a book and its status.
    ///
    /// Returns None when the key is unknown or has no status.
    pub async fn get_status(&self, external_key: &str) -> Result<Option<TrackedBook>, Error> {
        let external_key = external_key.to_string();
        self.with_connection(move |conn| query_one(conn, &external_key))
            .await
    }

    /// Set the reading status of a book, recording its metadata.
    ///
    /// The book row is created on first sight and otherwise has every
    /// metadata column overwritten. The status row keeps its `created_at`
    /// and gets a fresh `updated_at` on every call.
    pub async fn set_status(
        &self, external_key: &str, status: ReadingStatus, metadata: &BookMetadata,
    ) -> Result<TrackedBook, Error> {
        let external_key = external_key.to_string();
        let metadata = metadata.clone();
        let authors_json = encode_authors(&metadata.authors)?;
        let now = timestamp::now();

        tracing::debug!(external_key = %external_key, status = %status, "setting book status");

        self.with_connection(move |conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO books (external_key, title, authors_json, cover_url, first_publish_year)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(external_key) DO UPDATE SET
                    title = excluded.title,
                    authors_json = excluded.authors_json,
                    cover_url = excluded.cover_url,
                    first_publish_year = excluded.first_publish_year",
                params![
                    external_key,
                    metadata.title,
                    authors_json,
                    metadata.cover_url,
                    metadata.first_publish_year
                ],
            )?;

            let book_id: i64 =
                tx.query_row("SELECT id FROM books WHERE external_key = ?1", params![external_key], |row| {
                    row.get(0)
                })?;

            tx.execute(
                "INSERT INTO book_statuses (book_id, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)
                 ON CONFLICT(book_id) DO UPDATE SET
                    status = excluded.status,
                    updated_at = excluded.updated_at",
                params![book_id, status.as_str(), now],
            )?;

            let tracked = query_one(&tx, &external_key)?.ok_or_else(|| {
                Error::StorageIntegrity(format!("status for {external_key} missing after write"))
            })?;

            tx.commit()?;
            Ok(tracked)
        })
        .await
    }

    /// Remove the status of a book, and the book with it.
    ///
    /// Returns false without touching anything when the key is unknown.
    /// Both deletes commit together or not at all.
    pub async fn delete_status(&self, external_key: &str) -> Result<bool, Error> {
        let key = external_key.to_string();
        let deleted = self
            .with_connection(move |conn| {
                let tx = conn.transaction()?;

                let book_id = match tx.query_row(
                    "SELECT id FROM books WHERE external_key = ?1",
                    params![key],
                    |row| row.get::<_, i64>(0),
                ) {
                    Ok(id) => id,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(false),
                    Err(e) => return Err(e.into()),
                };

                let removed = tx.execute("DELETE FROM book_statuses WHERE book_id = ?1", params![book_id])?;
                tx.execute("DELETE FROM books WHERE id = ?1", params![book_id])?;
                tx.commit()?;

                Ok(removed > 0)
            })
            .await?;

        tracing::debug!(external_key, deleted, "deleted book status");
        Ok(deleted)
    }

    /// All tracked books, most recently updated first.
    pub async fn list_all(&self) -> Result<Vec<TrackedBook>, Error> {
        self.with_connection(|conn| {
            query_many(conn, &select_joined("ORDER BY s.updated_at DESC, s.id DESC"), [])
        })
        .await
    }

    /// Tracked books with one status, most recently updated first.
    pub async fn list_by_status(&self, status: ReadingStatus) -> Result<Vec<TrackedBook>, Error> {
        self.with_connection(move |conn| {
            query_many(
                conn,
                &select_joined("WHERE s.status = ?1 ORDER BY s.updated_at DESC, s.id DESC"),
                params![status.as_str()],
            )
        })
        .await
    }

    /// Statuses for a set of keys.
    ///
    /// Keys without a status are left out of the result. An empty input
    /// returns immediately without touching the database.
    pub async fn get_batch<I, S>(&self, external_keys: I) -> Result<HashMap<String, ReadingStatus>, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: BTreeSet<String> = external_keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Ok(HashMap::new());
        }
        let keys: Vec<String> = keys.into_iter().collect();

        self.with_connection(move |conn| {
            let mut statuses = HashMap::with_capacity(keys.len());
            for chunk in keys.chunks(BATCH_CHUNK_SIZE) {
                let placeholders = vec!["?"; chunk.len()].join(", ");
                let mut stmt = conn.prepare(&format!(
                    "SELECT b.external_key, s.status
                     FROM books b JOIN book_statuses s ON s.book_id = b.id
                     WHERE b.external_key IN ({placeholders})"
                ))?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(chunk.iter()), |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                for (key, status) in rows {
                    statuses.insert(key, ReadingStatus::from_stored(&status)?);
                }
            }
            Ok(statuses)
        })
        .await
    }

    /// Number of tracked books per status, zero-filled.
    pub async fn count_by_status(&self) -> Result<StatusCounts, Error> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM book_statuses GROUP BY status")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;

            let mut counts = StatusCounts::default();
            for (status, count) in rows {
                counts.set(ReadingStatus::from_stored(&status)?, count as u64);
            }
            Ok(counts)
        })
        .await
    }

    /// Number of book rows, tracked or not.
    pub async fn book_count(&self) -> Result<u64, Error> {
        self.with_connection(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }
}

//! Search response cache.
//!
//! Maps a normalized search request to the raw catalog payload fetched for
//! it. Expiry is lazy: `cache_get` filters out stale rows at read time and
//! only `cache_sweep_expired` (or `cache_clear`) physically removes them.

use super::connection::ShelfDb;
use super::hash::compute_search_key;
use super::timestamp;
use crate::Error;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::{params, rusqlite};

/// A stored search cache row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub query_hash: String,
    pub query: String,
    pub page: u32,
    pub page_size: u32,
    pub payload: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry may still be served at `now`.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl ShelfDb {
    /// Get a cached search payload.
    ///
    /// Returns None if no entry exists or its `expires_at` is not strictly in
    /// the future. Expired rows are left in place.
    pub async fn cache_get(&self, query: &str, page: u32, page_size: u32) -> Result<Option<String>, Error> {
        let query_hash = compute_search_key(query, page, page_size);
        let now = timestamp::now();
        let payload = self
            .with_connection(move |conn| {
                let result = conn.query_row(
                    "SELECT payload FROM search_cache WHERE query_hash = ?1 AND expires_at > ?2",
                    params![query_hash, now],
                    |row| row.get::<_, String>(0),
                );

                match result {
                    Ok(payload) => Ok(Some(payload)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await?;

        tracing::debug!(query, page, page_size, hit = payload.is_some(), "search cache lookup");
        Ok(payload)
    }

    /// Get the full cache row, expired or not.
    pub async fn cache_entry(&self, query: &str, page: u32, page_size: u32) -> Result<Option<CacheEntry>, Error> {
        let query_hash = compute_search_key(query, page, page_size);
        self.with_connection(move |conn| {
            let result = conn.query_row(
                "SELECT query_hash, query, page, page_size, payload, created_at, expires_at
                 FROM search_cache WHERE query_hash = ?1",
                params![query_hash],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, u32>(2)?,
                        row.get::<_, u32>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            );

            let (query_hash, query, page, page_size, payload, created_at, expires_at) = match result {
                Ok(row) => row,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            };

            Ok(Some(CacheEntry {
                query_hash,
                query,
                page,
                page_size,
                payload,
                created_at: timestamp::parse("created_at", &created_at)?,
                expires_at: timestamp::parse("expires_at", &expires_at)?,
            }))
        })
        .await
    }

    /// Insert or replace a cached search payload.
    ///
    /// The entry expires `ttl` from now. A write for a fingerprint that is
    /// already cached replaces every column of the old row. A `ttl` that
    /// moves the expiry outside years 0000 through 9999 is rejected.
    pub async fn cache_put(
        &self, query: &str, page: u32, page_size: u32, payload: &str, ttl: Duration,
    ) -> Result<(), Error> {
        let query_hash = compute_search_key(query, page, page_size);
        let query = query.to_string();
        let payload = payload.to_string();

        let created = Utc::now();
        let expires = timestamp::checked_offset(created, ttl)
            .ok_or_else(|| Error::Validation(format!("cache ttl of {}s is out of range", ttl.num_seconds())))?;
        let created_at = timestamp::format(created);
        let expires_at = timestamp::format(expires);

        tracing::debug!(query = %query, page, page_size, ttl_secs = ttl.num_seconds(), "caching search payload");

        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO search_cache (query_hash, query, page, page_size, payload, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(query_hash) DO UPDATE SET
                    query = excluded.query,
                    page = excluded.page,
                    page_size = excluded.page_size,
                    payload = excluded.payload,
                    created_at = excluded.created_at,
                    expires_at = excluded.expires_at",
                params![query_hash, query, page, page_size, payload, created_at, expires_at],
            )?;
            Ok(())
        })
        .await
    }

    /// Delete the entry for one search request.
    ///
    /// Returns whether a row was removed.
    pub async fn cache_invalidate(&self, query: &str, page: u32, page_size: u32) -> Result<bool, Error> {
        let query_hash = compute_search_key(query, page, page_size);
        self.with_connection(move |conn| {
            let count = conn.execute("DELETE FROM search_cache WHERE query_hash = ?1", params![query_hash])?;
            Ok(count > 0)
        })
        .await
    }

    /// Delete every entry whose `expires_at` is at or before now.
    ///
    /// Returns the number of deleted entries.
    pub async fn cache_sweep_expired(&self) -> Result<u64, Error> {
        let now = timestamp::now();
        let deleted = self
            .with_connection(move |conn| {
                let count = conn.execute("DELETE FROM search_cache WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await?;

        tracing::info!(deleted, "swept expired search cache entries");
        Ok(deleted)
    }

    /// Delete every cache entry.
    ///
    /// Returns the number of deleted entries.
    pub async fn cache_clear(&self) -> Result<u64, Error> {
        let deleted = self
            .with_connection(|conn| {
                let count = conn.execute("DELETE FROM search_cache", [])?;
                Ok(count as u64)
            })
            .await?;

        tracing::info!(deleted, "cleared search cache");
        Ok(deleted)
    }
}

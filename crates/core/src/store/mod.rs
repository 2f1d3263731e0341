//! SQLite-backed persistence for the search cache and the reading library.
//!
//! All access goes through [`ShelfDb`], which owns one connection on a
//! background thread via tokio-rusqlite. It provides:
//!
//! - A search response cache keyed by SHA-256 fingerprints, with lazy expiry
//! - Book metadata and reading status, kept strictly one-to-one
//! - Automatic, idempotent schema migrations

pub mod connection;
pub mod hash;
pub mod library;
pub mod migrations;
pub mod search_cache;
pub mod status;
pub mod timestamp;

pub use crate::Error;

pub use connection::ShelfDb;
pub use hash::compute_search_key;
pub use search_cache::CacheEntry;
pub use status::{BookMetadata, ReadingStatus, StatusCounts, TrackedBook};

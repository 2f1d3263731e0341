//! Core types and persistence for the shelf book tracker.
//!
//! This crate provides:
//! - SQLite-backed search cache and reading library
//! - Raw catalog payload types
//! - Unified error types
//! - Configuration structures

pub mod catalog;
pub mod config;
pub mod error;
pub mod store;

pub use catalog::{RawDoc, RawSearchResult};
pub use config::AppConfig;
pub use error::Error;
pub use store::{BookMetadata, CacheEntry, ReadingStatus, ShelfDb, StatusCounts, TrackedBook};

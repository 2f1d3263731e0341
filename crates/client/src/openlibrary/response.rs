//! Search response normalization.
//!
//! Turns the raw catalog payload (fresh or from the cache) into the stable
//! shape returned to callers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shelf_core::{RawDoc, RawSearchResult, ReadingStatus};
use std::collections::HashMap;

const UNKNOWN_TITLE: &str = "Unknown Title";

/// A book as shown in search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BookSummary {
    pub external_key: String,
    pub title: String,
    pub authors: Vec<String>,
    pub cover_url: Option<String>,
    pub first_publish_year: Option<i32>,
    /// Reading status, if the book is in the library.
    pub status: Option<ReadingStatus>,
}

/// Normalized search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResponse {
    pub books: Vec<BookSummary>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
}

/// Build a large cover image URL for a catalog work.
///
/// Prefers the cover id; falls back to the first ISBN. A cover id of 0 is
/// treated as absent.
pub fn build_cover_url(doc: &RawDoc, covers_base_url: &str) -> Option<String> {
    let base = covers_base_url.trim_end_matches('/');

    if let Some(cover_id) = doc.cover_id
        && cover_id != 0
    {
        return Some(format!("{base}/id/{cover_id}-L.jpg"));
    }

    doc.isbn_list
        .first()
        .map(|isbn| format!("{base}/isbn/{isbn}-L.jpg"))
}

impl BookSummary {
    fn from_doc(doc: &RawDoc, covers_base_url: &str) -> Self {
        Self {
            external_key: doc.identifier.clone(),
            title: doc.title.clone().unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            authors: doc.author_names.clone(),
            cover_url: build_cover_url(doc, covers_base_url),
            first_publish_year: doc.first_publish_year,
            status: None,
        }
    }
}

impl SearchResponse {
    /// Normalize one page of raw results.
    pub fn from_raw(raw: &RawSearchResult, page: u32, limit: u32, covers_base_url: &str) -> Self {
        let total = raw.total_count;
        let total_pages = if limit > 0 { total.div_ceil(u64::from(limit)) } else { 0 };

        Self {
            books: raw
                .items
                .iter()
                .map(|doc| BookSummary::from_doc(doc, covers_base_url))
                .collect(),
            total,
            page,
            total_pages,
        }
    }

    /// Keys of every book on this page.
    pub fn external_keys(&self) -> impl Iterator<Item = &str> {
        self.books.iter().map(|b| b.external_key.as_str())
    }

    /// Attach library statuses to the books that have one.
    pub fn with_statuses(mut self, statuses: &HashMap<String, ReadingStatus>) -> Self {
        for book in &mut self.books {
            book.status = statuses.get(&book.external_key).copied();
        }
        self
    }
}

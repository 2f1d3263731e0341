//! Raw search results from the external book catalog.
//!
//! These mirror the Open Library `search.json` shape closely enough to
//! round-trip through JSON, which is how they are stored in the search cache.

use serde::{Deserialize, Serialize};

/// One page of catalog search results, as fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSearchResult {
    #[serde(rename = "docs", default)]
    pub items: Vec<RawDoc>,

    #[serde(rename = "numFound", alias = "num_found", default)]
    pub total_count: u64,
}

/// A single catalog work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDoc {
    /// Work key, e.g. `/works/OL27448W`.
    #[serde(rename = "key", default)]
    pub identifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "author_name", default, skip_serializing_if = "Vec::is_empty")]
    pub author_names: Vec<String>,

    #[serde(rename = "cover_i", default, skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<i64>,

    #[serde(rename = "isbn", default, skip_serializing_if = "Vec::is_empty")]
    pub isbn_list: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
}

//! Open Library search client.
//!
//! Fetches one page of results from `search.json` and hands back the raw
//! payload. Caching happens in the caller; this client never touches the
//! database.
//!
//! ### Endpoint
//!
//! - **Search**: `GET {base_url}/search.json?q=..&page=..&limit=..`
//! - **Covers**: `{covers_url}/id/{cover_i}-L.jpg` or `{covers_url}/isbn/{isbn}-L.jpg`
//! - Pages are 1-indexed; `limit` is capped at 100 by the API.

pub mod error;
pub mod response;

pub use error::OpenLibraryError;
pub use response::{BookSummary, SearchResponse, build_cover_url};

use reqwest::header;
use serde::Serialize;
use shelf_core::RawSearchResult;
use std::time::{Duration, Instant};
use url::Url;

/// Default base URL for the Open Library API.
const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Default base URL for cover images.
const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org/b";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "shelf/0.1";

/// Largest page the API serves.
pub const MAX_LIMIT: u32 = 100;

/// Open Library client configuration.
#[derive(Debug, Clone)]
pub struct OpenLibraryConfig {
    /// Base URL (default: https://openlibrary.org).
    pub base_url: String,
    /// Cover image base URL (default: https://covers.openlibrary.org/b).
    pub covers_url: String,
    /// Request timeout (default: 30s).
    pub timeout: Duration,
    /// User-agent string (default: shelf/0.x).
    pub user_agent: String,
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            covers_url: DEFAULT_COVERS_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&shelf_core::AppConfig> for OpenLibraryConfig {
    fn from(config: &shelf_core::AppConfig) -> Self {
        Self {
            base_url: config.openlibrary_base_url.clone(),
            covers_url: config.covers_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchQuery<'a> {
    q: &'a str,
    page: u32,
    limit: u32,
}

/// Validate search parameters before any request is made.
pub fn validate_search(query: &str, page: u32, limit: u32) -> Result<(), OpenLibraryError> {
    if query.trim().is_empty() {
        return Err(OpenLibraryError::InvalidQuery("query cannot be empty".to_string()));
    }

    if page < 1 {
        return Err(OpenLibraryError::InvalidQuery("page must be at least 1".to_string()));
    }

    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(OpenLibraryError::InvalidQuery(format!("limit must be between 1 and {MAX_LIMIT}")));
    }

    Ok(())
}

/// Open Library search client.
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    search_url: Url,
    config: OpenLibraryConfig,
}

impl OpenLibraryClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OpenLibraryConfig) -> Result<Self, OpenLibraryError> {
        let base = Url::parse(&format!("{}/", config.base_url.trim_end_matches('/')))
            .map_err(|e| OpenLibraryError::InvalidQuery(format!("invalid base URL {}: {e}", config.base_url)))?;
        let search_url = base
            .join("search.json")
            .map_err(|e| OpenLibraryError::InvalidQuery(format!("invalid base URL {}: {e}", config.base_url)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { http, search_url, config })
    }

    /// Cover image base URL, for [`SearchResponse::from_raw`].
    pub fn covers_url(&self) -> &str {
        &self.config.covers_url
    }

    /// The resolved search endpoint.
    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    /// Fetch one page of search results.
    pub async fn search(&self, query: &str, page: u32, limit: u32) -> Result<RawSearchResult, OpenLibraryError> {
        validate_search(query, page, limit)?;

        let start = Instant::now();
        tracing::debug!(query, page, limit, "searching Open Library");

        let http_response = self
            .http
            .get(self.search_url.clone())
            .header(header::ACCEPT, "application/json")
            .query(&SearchQuery { q: query, page, limit })
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(%status, "Open Library response status");

        if status.is_client_error() || status.is_server_error() {
            return Err(OpenLibraryError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let raw: RawSearchResult =
            serde_json::from_slice(&bytes).map_err(|e| OpenLibraryError::Parse(e.to_string()))?;

        tracing::debug!(
            elapsed = ?start.elapsed(),
            results = raw.items.len(),
            total = raw.total_count,
            "search completed"
        );

        Ok(raw)
    }
}

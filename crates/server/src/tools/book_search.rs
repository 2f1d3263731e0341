//! book_search tool implementation.
//!
//! Searches the Open Library catalog through the search cache and marks
//! every result with its reading status, if the book is tracked.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shelf_client::{OpenLibraryClient, SearchResponse, openlibrary::validate_search};
use shelf_core::{AppConfig, Error, RawSearchResult, ShelfDb};

use super::json_result;

/// Input parameters for book_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BookSearchParams {
    /// Search query (required).
    pub query: String,

    /// Page number, 1-indexed (default 1).
    #[serde(default)]
    pub page: Option<u32>,

    /// Results per page (1-100, default from configuration).
    #[serde(default)]
    pub limit: Option<u32>,

    /// Force a refresh, bypassing the cache.
    #[serde(default)]
    pub force_refresh: bool,
}

/// Output structure for book_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookSearchOutput {
    #[serde(flatten)]
    pub response: SearchResponse,
    /// Whether the page came from the search cache.
    pub cache_hit: bool,
}

/// Look up a cached page.
///
/// A stored payload that no longer decodes is treated as a miss; storage
/// failures propagate.
async fn cached_page(db: &ShelfDb, query: &str, page: u32, limit: u32) -> Result<Option<RawSearchResult>, Error> {
    let Some(payload) = db.cache_get(query, page, limit).await? else {
        return Ok(None);
    };

    match serde_json::from_str(&payload) {
        Ok(raw) => Ok(Some(raw)),
        Err(e) => {
            tracing::warn!(error = %e, query, page, limit, "discarding undecodable cached search payload");
            Ok(None)
        }
    }
}

/// Implementation of the book_search tool.
pub async fn search_impl(
    db: &ShelfDb, client: &OpenLibraryClient, config: &AppConfig, params: BookSearchParams,
) -> Result<CallToolResult, McpError> {
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(config.default_page_size);
    validate_search(&params.query, page, limit).map_err(Error::from)?;

    let cached = if params.force_refresh { None } else { cached_page(db, &params.query, page, limit).await? };
    let cache_hit = cached.is_some();

    let raw = match cached {
        Some(raw) => {
            tracing::debug!(query = %params.query, page, limit, "cache hit for book search");
            raw
        }
        None => {
            tracing::debug!(query = %params.query, page, limit, "cache miss for book search");
            let raw = client
                .search(&params.query, page, limit)
                .await
                .map_err(Error::from)?;

            match serde_json::to_string(&raw) {
                Ok(payload) => {
                    if let Err(e) = db
                        .cache_put(&params.query, page, limit, &payload, config.cache_ttl())
                        .await
                    {
                        tracing::warn!(error = %e, "failed to cache search result");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "failed to encode search result for caching"),
            }

            raw
        }
    };

    let response = SearchResponse::from_raw(&raw, page, limit, client.covers_url());
    let statuses = db.get_batch(response.external_keys()).await?;
    let output = BookSearchOutput { response: response.with_statuses(&statuses), cache_hit };

    json_result(&output)
}

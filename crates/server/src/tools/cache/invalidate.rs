//! cache_invalidate tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shelf_core::{AppConfig, ShelfDb};

use crate::tools::json_result;

/// Parameters for the cache_invalidate tool.
///
/// Names the same search request book_search would have cached.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateParams {
    pub query: String,

    #[serde(default)]
    pub page: Option<u32>,

    #[serde(default)]
    pub limit: Option<u32>,
}

/// Output from the cache_invalidate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateOutput {
    /// Whether an entry was removed.
    pub removed: bool,
}

/// Implementation of the cache_invalidate tool.
pub async fn invalidate_impl(
    db: &ShelfDb, config: &AppConfig, params: CacheInvalidateParams,
) -> Result<CallToolResult, McpError> {
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(config.default_page_size);
    let removed = db.cache_invalidate(&params.query, page, limit).await?;

    json_result(&CacheInvalidateOutput { removed })
}

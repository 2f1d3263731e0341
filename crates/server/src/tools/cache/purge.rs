//! cache_purge tool implementation.
//!
//! Removes expired search cache entries, or every entry.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shelf_core::ShelfDb;

use crate::tools::json_result;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Only remove expired entries (default true). False empties the cache.
    #[serde(default = "default_true")]
    pub expired_only: bool,
}

impl Default for CachePurgeParams {
    fn default() -> Self {
        Self { expired_only: true }
    }
}

fn default_true() -> bool {
    true
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(db: &ShelfDb, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let deleted = if params.expired_only { db.cache_sweep_expired().await? } else { db.cache_clear().await? };

    json_result(&CachePurgeOutput { deleted })
}

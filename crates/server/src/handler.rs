//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use crate::tools::{
    book_search::{BookSearchParams, search_impl},
    cache::{CacheInvalidateParams, CachePurgeParams, invalidate_impl, purge_impl},
    library_counts::counts_impl,
    status::{StatusKeyParams, StatusListParams, StatusSetParams, delete_impl, get_impl, list_impl, set_impl},
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use shelf_client::OpenLibraryClient;
use shelf_core::{AppConfig, ShelfDb};
use std::sync::Arc;

/// The main MCP server handler for mcp-shelf.
#[derive(Clone)]
pub struct ShelfServer {
    tool_router: ToolRouter<Self>,
    db: ShelfDb,
    client: OpenLibraryClient,
    config: Arc<AppConfig>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl ShelfServer {
    /// Create a new server handler.
    pub fn new(db: ShelfDb, client: OpenLibraryClient, config: AppConfig) -> Self {
        Self { tool_router: Self::tool_router(), db, client, config: Arc::new(config) }
    }

    #[tool(
        description = "Search the Open Library catalog. Results are cached per query, page and limit; each book carries its reading status if tracked."
    )]
    async fn book_search(&self, params: Parameters<BookSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.db, &self.client, &self.config, params.0).await
    }

    #[tool(description = "Get the reading status and metadata of a tracked book by its work key.")]
    async fn status_get(&self, params: Parameters<StatusKeyParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.db, params.0).await
    }

    #[tool(
        description = "Set the reading status of a book (to_read, did_not_finish, completed), recording its title, authors and cover."
    )]
    async fn status_set(&self, params: Parameters<StatusSetParams>) -> Result<CallToolResult, McpError> {
        set_impl(&self.db, params.0).await
    }

    #[tool(description = "Stop tracking a book, removing its reading status.")]
    async fn status_delete(&self, params: Parameters<StatusKeyParams>) -> Result<CallToolResult, McpError> {
        delete_impl(&self.db, params.0).await
    }

    #[tool(description = "List tracked books, most recently updated first, optionally filtered by status.")]
    async fn status_list(&self, params: Parameters<StatusListParams>) -> Result<CallToolResult, McpError> {
        list_impl(&self.db, params.0).await
    }

    #[tool(description = "Count tracked books per reading status.")]
    async fn library_counts(&self) -> Result<CallToolResult, McpError> {
        counts_impl(&self.db).await
    }

    #[tool(description = "Remove expired search cache entries, or every entry when expired_only is false.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.db, params.0).await
    }

    #[tool(description = "Drop the cached results of one search (query, page, limit).")]
    async fn cache_invalidate(&self, params: Parameters<CacheInvalidateParams>) -> Result<CallToolResult, McpError> {
        invalidate_impl(&self.db, &self.config, params.0).await
    }
}

impl ServerHandler for ShelfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-shelf".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Search books on Open Library and track what you want to read, gave up on, or finished.".into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

//! mcp-shelf server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::{Context, Result};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use shelf_client::{OpenLibraryClient, OpenLibraryConfig};
use shelf_core::{AppConfig, ShelfDb};
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    if let Some(parent) = config.db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create database directory {}", parent.display()))?;
    }

    let db = ShelfDb::open(&config.db_path).await?;
    let swept = db.cache_sweep_expired().await?;
    let client = OpenLibraryClient::new(OpenLibraryConfig::from(&config))?;

    tracing::info!(
        db_path = %config.db_path.display(),
        cache_ttl_hours = config.cache_ttl_hours,
        swept,
        "Starting mcp-shelf server on stdio transport"
    );

    let handler = handler::ShelfServer::new(db, client, config);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}

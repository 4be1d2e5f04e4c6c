//! Daemon entry point for the KAY query gateway.
//!
//! Loads configuration from the environment, opens the shared database pool,
//! and serves the MCP protocol over stdio until the client goes away.

mod config;

use std::sync::Arc;

use kay_core::store::PgKayStore;
use kay_mcp::server::serve_stdio;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::KayConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = KayConfig::from_args()?;
    init_tracing(&config.log_filter)?;

    let store = Arc::new(PgKayStore::connect(&config.store_options()).await?);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        "kay-query MCP server running on stdio"
    );

    let served = serve_stdio(store.clone()).await;
    store.close().await;
    served
}

/// Logs go to stderr; stdout belongs to the MCP transport.
fn init_tracing(filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter)?)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
}

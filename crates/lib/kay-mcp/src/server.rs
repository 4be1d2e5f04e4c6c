//! MCP server runner for kay-query.

use std::sync::Arc;

use kay_core::store::KayStore;
use rmcp::serve_server;
use rmcp::transport::io::stdio;

use crate::KayMcp;

/// Serves the MCP server over stdio until the client disconnects.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio<S: KayStore + 'static>(
    store: Arc<S>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let service = KayMcp::with_store(store);
    let (stdin, stdout) = stdio();
    let running = serve_server(service, (stdin, stdout)).await?;
    let reason = running.waiting().await?;
    tracing::info!(?reason, "mcp session ended");
    Ok(())
}

//! MCP server implementation for kay-query.
//!
//! This crate wires the KAY control plane into a stdio MCP server and exposes
//! the three read-only tools an assistant uses to inspect the running system.

mod helpers;
pub mod server;
pub mod tools;

use std::sync::Arc;

use kay_core::control::KayControlPlane;
use kay_core::store::KayStore;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};

pub use tools::DispatchError;

const SERVER_INSTRUCTIONS: &str = r"kay-query gives read-only access to KAY, Oscar's personal automation system.

Tools:
- `query_kay_system` runs a fixed live query against KAY's database. Pick an `entity` such as
  `recent-syncs`, `sync-health`, `tasks-summary`, or `database-schema`.
- `get_kay_config` returns static configuration for a `component`: `cron-schedule`,
  `sync-configuration`, `telegram-bot`, `file-processing`, or `integrations`.
- `get_memory_topics` lists the MEMORY topics and where their markdown lives.

Notes:
- Nothing here writes to the database.
- Unknown names return `success: false` with the list of valid names.";

/// MCP server wrapper around the KAY control plane.
pub struct KayMcp<S: KayStore> {
    control: KayControlPlane<S>,
}

impl<S: KayStore> Clone for KayMcp<S> {
    fn clone(&self) -> Self {
        Self {
            control: self.control.clone(),
        }
    }
}

impl<S: KayStore> KayMcp<S> {
    /// Creates a new server owning its store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_store(Arc::new(store))
    }

    /// Creates a new server over a shared store handle.
    #[must_use]
    pub const fn with_store(store: Arc<S>) -> Self {
        Self {
            control: KayControlPlane::from_arc(store),
        }
    }

    /// Tool descriptors advertised by `tools/list`.
    #[must_use]
    pub fn tools(&self) -> Vec<rmcp::model::Tool> {
        tools::registry::tools()
    }
}

impl<S: KayStore + 'static> ServerHandler for KayMcp<S> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "kay-query".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(self
            .dispatch(&request.name, request.arguments.as_ref())
            .await)
    }
}

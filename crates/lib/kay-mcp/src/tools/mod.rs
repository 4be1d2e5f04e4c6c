//! MCP tool modules.
//!
//! The registry advertises the three tools; the dispatcher routes calls to
//! the control plane and folds every failure into an error-flagged result.

pub mod dispatch;
pub mod params;
pub mod registry;

use std::{error::Error, fmt};

use kay_core::store::StoreError;

pub const QUERY_KAY_SYSTEM: &str = "query_kay_system";
pub const GET_KAY_CONFIG: &str = "get_kay_config";
pub const GET_MEMORY_TOPICS: &str = "get_memory_topics";

/// Every way a tool call can fail before or after reaching a catalog.
#[derive(Debug)]
pub enum DispatchError {
    UnknownTool(String),
    InvalidArguments(serde_json::Error),
    Store(StoreError),
    Serialize(serde_json::Error),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTool(name) => write!(f, "Unknown tool: {name}"),
            Self::InvalidArguments(err) => write!(f, "invalid arguments: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize result: {err}"),
        }
    }
}

impl Error for DispatchError {}

impl From<StoreError> for DispatchError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err)
    }
}

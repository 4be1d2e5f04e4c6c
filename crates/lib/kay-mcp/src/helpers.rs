use kay_store::Outcome;
use rmcp::model::{CallToolResult, Content};

use crate::tools::DispatchError;

/// Pretty-prints an outcome into a single text block.
pub fn success(outcome: &Outcome) -> Result<CallToolResult, DispatchError> {
    let text = serde_json::to_string_pretty(outcome)?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

pub fn failure(err: &DispatchError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {err}"))])
}

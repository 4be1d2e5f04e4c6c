use kay_core::store::KayStore;
use kay_store::Outcome;
use rmcp::model::{CallToolResult, JsonObject};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use super::params::{GetKayConfigParams, GetMemoryTopicsParams, QueryKaySystemParams};
use super::{DispatchError, GET_KAY_CONFIG, GET_MEMORY_TOPICS, QUERY_KAY_SYSTEM};
use crate::{KayMcp, helpers};

impl<S: KayStore> KayMcp<S> {
    /// Routes one tool call and always answers with a tool result.
    ///
    /// Unknown tools, malformed arguments, and store faults come back as
    /// error-flagged results carrying `Error: <message>`, never as protocol
    /// errors. Unknown entity or component names are ordinary results with
    /// `success: false`.
    pub async fn dispatch(&self, name: &str, arguments: Option<&JsonObject>) -> CallToolResult {
        info!(tool = name, "tool call");
        match self.route(name, arguments).await {
            Ok(outcome) => helpers::success(&outcome).unwrap_or_else(|err| {
                warn!(tool = name, error = %err, "tool result could not be encoded");
                helpers::failure(&err)
            }),
            Err(err) => {
                warn!(tool = name, error = %err, "tool call failed");
                helpers::failure(&err)
            }
        }
    }

    async fn route(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> Result<Outcome, DispatchError> {
        match name {
            QUERY_KAY_SYSTEM => {
                let params: QueryKaySystemParams = parse_arguments(arguments)?;
                Ok(self.control.query_system(&params.entity).await?)
            }
            GET_KAY_CONFIG => {
                let params: GetKayConfigParams = parse_arguments(arguments)?;
                Ok(self.control.get_config(&params.component))
            }
            GET_MEMORY_TOPICS => {
                let GetMemoryTopicsParams {} = parse_arguments(arguments)?;
                Ok(self.control.memory_topics().into())
            }
            other => Err(DispatchError::UnknownTool(other.to_string())),
        }
    }
}

/// Absent arguments parse as an empty object.
fn parse_arguments<T: DeserializeOwned>(arguments: Option<&JsonObject>) -> Result<T, DispatchError> {
    let value = Value::Object(arguments.cloned().unwrap_or_default());
    serde_json::from_value(value).map_err(DispatchError::InvalidArguments)
}

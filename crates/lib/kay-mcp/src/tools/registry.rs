use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use schemars::JsonSchema;

use super::params::{GetKayConfigParams, GetMemoryTopicsParams, QueryKaySystemParams};
use super::{GET_KAY_CONFIG, GET_MEMORY_TOPICS, QUERY_KAY_SYSTEM};

const QUERY_KAY_SYSTEM_DESCRIPTION: &str = "Query KAY's live system state. Get actual data from Oscar's running PAI - sync runs, tasks, files, Telegram usage, database stats, etc.";
const GET_KAY_CONFIG_DESCRIPTION: &str = "Get KAY's actual configuration - cron schedules, sync settings, integrations, file processing pipeline, etc.";
const GET_MEMORY_TOPICS_DESCRIPTION: &str = "Get list of MEMORY topics available. The actual learnings are in the GitHub repo markdown files that your assistant can read directly.";

/// Descriptors for every tool this server answers.
///
/// The `enum` lists come from the catalogs themselves. They are advisory:
/// the catalogs still reject anything outside their closed sets.
#[must_use]
pub fn tools() -> Vec<Tool> {
    vec![
        Tool::new(
            QUERY_KAY_SYSTEM,
            QUERY_KAY_SYSTEM_DESCRIPTION,
            input_schema::<QueryKaySystemParams>(),
        ),
        Tool::new(
            GET_KAY_CONFIG,
            GET_KAY_CONFIG_DESCRIPTION,
            input_schema::<GetKayConfigParams>(),
        ),
        Tool::new(
            GET_MEMORY_TOPICS,
            GET_MEMORY_TOPICS_DESCRIPTION,
            input_schema::<GetMemoryTopicsParams>(),
        ),
    ]
}

fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    Arc::new(schema.as_object().cloned().unwrap_or_default())
}

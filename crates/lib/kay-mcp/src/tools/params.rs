//! Typed arguments for the three tools.
//!
//! Names stay plain strings so an unknown entity or component still reaches
//! the catalog and comes back as `success: false` with the valid names. The
//! schemas list those names from the catalogs themselves.

use kay_core::catalog::{ConfigComponent, QueryEntity};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::Deserialize;
use serde_json::Value;

/// Parameters for `query_kay_system`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryKaySystemParams {
    #[schemars(schema_with = "entity_schema")]
    pub entity: String,
}

/// Parameters for `get_kay_config`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetKayConfigParams {
    #[schemars(schema_with = "component_schema")]
    pub component: String,
}

/// `get_memory_topics` takes nothing; extra keys are ignored.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetMemoryTopicsParams {}

fn entity_schema(generator: &mut SchemaGenerator) -> Schema {
    name_schema(
        generator,
        QueryEntity::names(),
        "What aspect of KAY's system to query",
    )
}

fn component_schema(generator: &mut SchemaGenerator) -> Schema {
    name_schema(
        generator,
        ConfigComponent::names(),
        "Which configuration to retrieve",
    )
}

fn name_schema(
    generator: &mut SchemaGenerator,
    names: impl Iterator<Item = &'static str>,
    description: &str,
) -> Schema {
    let mut schema = generator.subschema_for::<String>();
    schema.insert("enum".to_string(), names.map(Value::from).collect());
    schema.insert("description".to_string(), Value::from(description));
    schema
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_names_still_parse() {
        let params: QueryKaySystemParams =
            serde_json::from_value(json!({ "entity": "everything" })).expect("string entity");
        assert_eq!(params.entity, "everything");
    }

    #[test]
    fn non_string_name_is_rejected() {
        let err = serde_json::from_value::<GetKayConfigParams>(json!({ "component": 3 }))
            .expect_err("component must be a string");
        assert!(err.to_string().contains("invalid type"));
    }

    #[test]
    fn memory_topics_accepts_any_object() {
        serde_json::from_value::<GetMemoryTopicsParams>(json!({ "verbose": true }))
            .expect("extra keys are ignored");
    }
}

use kay_core::catalog::{self, ConfigComponent, QueryEntity};
use kay_core::control::KayControlPlane;
use kay_core::store::MemoryStore;
use kay_store::{Outcome, Row};
use serde_json::{Value, json};

fn rows(value: Value) -> Vec<Row> {
    serde_json::from_value(value).expect("rows fixture should be an array of objects")
}

fn found(outcome: Outcome) -> kay_store::Envelope {
    match outcome {
        Outcome::Found(envelope) => envelope,
        Outcome::Unknown(unknown) => panic!("expected envelope, got {unknown:?}"),
    }
}

#[tokio::test]
async fn every_query_entity_succeeds_with_description() {
    let store = MemoryStore::new();

    for name in QueryEntity::names() {
        let envelope = found(
            catalog::query_system(&store, name)
                .await
                .unwrap_or_else(|err| panic!("{name} failed: {err}")),
        );
        assert!(envelope.success, "{name} should succeed");
        assert!(!envelope.description.is_empty(), "{name} needs a description");
    }
}

#[test]
fn every_config_component_succeeds_with_description() {
    for name in ConfigComponent::names() {
        let envelope = found(catalog::get_config(name));
        assert!(envelope.success, "{name} should succeed");
        assert!(!envelope.description.is_empty(), "{name} needs a description");
    }
}

#[tokio::test]
async fn unknown_entity_lists_exactly_the_catalog() {
    let store = MemoryStore::new();
    let outcome = catalog::query_system(&store, "all-the-things")
        .await
        .expect("unknown entity is answered locally");

    let Outcome::Unknown(unknown) = outcome else {
        panic!("expected unknown entity");
    };
    assert!(!unknown.success);
    assert_eq!(unknown.error, "Unknown entity: all-the-things");
    assert_eq!(unknown.available, QueryEntity::names().collect::<Vec<_>>());
}

#[test]
fn unknown_component_lists_exactly_the_catalog() {
    let outcome = catalog::get_config("nonexistent");

    let value = serde_json::to_value(&outcome).expect("outcome serializes");
    assert_eq!(
        value,
        json!({
            "success": false,
            "error": "Unknown component: nonexistent",
            "available": [
                "cron-schedule",
                "sync-configuration",
                "telegram-bot",
                "file-processing",
                "integrations"
            ]
        })
    );
}

#[test]
fn integrations_lists_eight_services() {
    let envelope = found(catalog::get_config("integrations"));
    let services = envelope.extra["services"]
        .as_array()
        .expect("services should be a list");
    let names: Vec<&str> = services
        .iter()
        .filter_map(|service| service["name"].as_str())
        .collect();

    assert_eq!(names.len(), 8);
    assert!(names.contains(&"Notion"));
    assert!(names.contains(&"Telegram"));
}

#[tokio::test]
async fn tasks_summary_totals_grouped_counts() {
    let store = MemoryStore::new().with_rows(
        QueryEntity::TasksSummary.statement(),
        rows(json!([
            {"status": "open", "count": 2, "high_priority": 1, "overdue": 0, "synced_to_notion": 2},
            {"status": "done", "count": 1, "high_priority": 0, "overdue": 0, "synced_to_notion": 1}
        ])),
    );
    let control = KayControlPlane::new(store);

    let envelope = found(control.query_system("tasks-summary").await.expect("query runs"));

    assert_eq!(envelope.extra["total"], json!(3));
    let grouped: i64 = envelope
        .data
        .as_array()
        .expect("grouped rows")
        .iter()
        .filter_map(|row| row["count"].as_i64())
        .sum();
    assert_eq!(grouped, 3);
}

#[tokio::test]
async fn sync_health_with_no_runs_reports_not_available() {
    let store = MemoryStore::new();

    let envelope = found(
        catalog::query_system(&store, "sync-health")
            .await
            .expect("query runs"),
    );
    let metrics = envelope.metrics.expect("sync health carries metrics");
    assert_eq!(metrics["total_scripts"], json!(0));
    assert_eq!(metrics["overall_success_rate"], json!("N/A"));
}

#[tokio::test]
async fn database_schema_counts_tables() {
    let store = MemoryStore::new().with_rows(
        QueryEntity::DatabaseSchema.statement(),
        rows(json!([
            {"table_name": "tasks", "column_count": 14, "size": "1024 kB"},
            {"table_name": "files", "column_count": 20, "size": "8192 kB"}
        ])),
    );

    let envelope = found(
        catalog::query_system(&store, "database-schema")
            .await
            .expect("query runs"),
    );
    assert_eq!(envelope.extra["total_tables"], json!(2));
}

#[tokio::test]
async fn store_fault_in_any_entity_is_an_error() {
    let store = MemoryStore::new().failing("connection reset by peer");

    for name in QueryEntity::names() {
        let err = catalog::query_system(&store, name)
            .await
            .expect_err("store fault should propagate");
        assert_eq!(err.to_string(), "connection reset by peer");
    }
}

#[test]
fn memory_topics_are_idempotent() {
    let first = serde_json::to_value(catalog::memory_topics()).expect("serializes");
    let second = serde_json::to_value(catalog::memory_topics()).expect("serializes");

    assert_eq!(first, second);
    assert_eq!(
        first["learnings_topics"],
        json!(["Environment", "Infrastructure", "Security", "TypeScript", "PAI"])
    );
}

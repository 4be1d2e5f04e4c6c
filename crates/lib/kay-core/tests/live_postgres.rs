//! Runs the catalog against a real KAY database.
//!
//! Skipped unless `KAY_TEST_DATABASE_URL` points at one.

use kay_core::catalog::{self, QueryEntity};
use kay_core::store::{KayStore, PgKayStore, PgStoreOptions};

fn database_url() -> Option<String> {
    std::env::var("KAY_TEST_DATABASE_URL")
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[tokio::test]
async fn live_catalog_roundtrip() {
    let Some(url) = database_url() else {
        eprintln!("KAY_TEST_DATABASE_URL not set; skipping live catalog test");
        return;
    };

    let store = PgKayStore::connect(&PgStoreOptions::new(url).with_max_connections(1))
        .await
        .expect("failed to connect to KAY test database");

    let identity = store
        .fetch_rows(kay_core::preflight::CONNECTION_SQL)
        .await
        .expect("connectivity query should succeed");
    assert_eq!(identity.len(), 1);

    for entity in QueryEntity::ALL {
        let outcome = catalog::query_system(&store, entity.as_str())
            .await
            .unwrap_or_else(|err| panic!("{entity} failed against live database: {err}"));
        assert!(outcome.is_success(), "{entity} should succeed");
    }

    store.close().await;
}

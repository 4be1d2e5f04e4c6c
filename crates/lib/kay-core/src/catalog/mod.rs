//! Closed catalogs behind the MCP tools.
//!
//! Queries hit the store, configuration and memory topics are static.

pub mod config;
pub mod query;
pub mod topics;

use kay_store::Outcome;

pub use config::ConfigComponent;
pub use query::QueryEntity;
pub use topics::memory_topics;

use crate::store::{KayStore, StoreResult};

/// Resolves `name` against the query catalog and runs it.
///
/// Unknown names are answered without touching the store.
///
/// # Errors
/// Returns `StoreError` if the matched statement fails.
pub async fn query_system<S: KayStore>(store: &S, name: &str) -> StoreResult<Outcome> {
    match name.parse::<QueryEntity>() {
        Ok(entity) => Ok(entity.execute(store).await?.into()),
        Err(unknown) => Ok(unknown.into()),
    }
}

/// Resolves `name` against the config catalog.
#[must_use]
pub fn get_config(name: &str) -> Outcome {
    config::lookup(name)
}

use std::sync::Arc;

use kay_store::{Envelope, Outcome};
use tracing::{debug, warn};

use crate::catalog;
use crate::store::{KayStore, StoreResult};

/// Entry point for the three catalog operations over one shared store.
pub struct KayControlPlane<S: KayStore> {
    store: Arc<S>,
}

impl<S: KayStore> Clone for KayControlPlane<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: KayStore> KayControlPlane<S> {
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    pub const fn from_arc(store: Arc<S>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs a live query by entity name.
    ///
    /// # Errors
    /// Returns `StoreError` if the database rejects or fails the statement.
    pub async fn query_system(&self, entity: &str) -> StoreResult<Outcome> {
        debug!(entity, "query_kay_system");
        let outcome = catalog::query_system(self.store.as_ref(), entity).await;
        match &outcome {
            Ok(Outcome::Unknown(_)) => debug!(entity, "unknown query entity"),
            Err(err) => warn!(entity, error = %err, "query failed"),
            Ok(Outcome::Found(_)) => {}
        }
        outcome
    }

    /// Fetches a static configuration component by name.
    pub fn get_config(&self, component: &str) -> Outcome {
        debug!(component, "get_kay_config");
        catalog::get_config(component)
    }

    /// Lists the MEMORY topics.
    pub fn memory_topics(&self) -> Envelope {
        debug!("get_memory_topics");
        catalog::memory_topics()
    }
}

//! Location catalog collaborator implementation
//!
//! The portal owns location CRUD; the engine only reads. This in-memory
//! catalog is seeded by the binary (or by tests) and looked up by id.

use posada_core::{models::LocationInfo, traits::LocationCatalog, AppResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

/// In-memory implementation of `LocationCatalog`
#[derive(Default)]
pub struct MemoryLocationCatalog {
    locations: RwLock<HashMap<Uuid, LocationInfo>>,
}

impl MemoryLocationCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a location
    pub async fn upsert(&self, location: LocationInfo) {
        self.locations.write().await.insert(location.id, location);
    }

    /// Remove a location
    pub async fn remove(&self, id: Uuid) -> bool {
        self.locations.write().await.remove(&id).is_some()
    }
}

#[async_trait]
impl LocationCatalog for MemoryLocationCatalog {
    #[instrument(skip(self))]
    async fn get_location(&self, id: Uuid) -> AppResult<Option<LocationInfo>> {
        debug!("Looking up location {}", id);
        Ok(self.locations.read().await.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posada_core::models::LocationKind;

    #[tokio::test]
    async fn test_upsert_and_get() {
        let catalog = MemoryLocationCatalog::new();
        let location = LocationInfo {
            name: "Mesa 3".to_string(),
            kind: LocationKind::Table,
            ..Default::default()
        };
        let id = location.id;

        catalog.upsert(location).await;
        let found = catalog.get_location(id).await.unwrap().unwrap();
        assert_eq!(found.name, "Mesa 3");

        assert!(catalog.remove(id).await);
        assert!(catalog.get_location(id).await.unwrap().is_none());
    }
}

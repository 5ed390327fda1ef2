//! Reservation repository implementation
//!
//! In-memory storage for reservations with specialized queries for the
//! calendar index rebuild and status filtering.

use posada_core::{
    models::{Reservation, ReservationStatus},
    traits::{Repository, ReservationRepository},
    AppError, AppResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

/// In-memory implementation of `ReservationRepository`
#[derive(Default)]
pub struct MemoryReservationRepository {
    items: RwLock<HashMap<Uuid, Reservation>>,
}

impl MemoryReservationRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<Reservation, Uuid> for MemoryReservationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        debug!("Finding reservation by id: {}", id);
        Ok(self.items.read().await.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Reservation>> {
        let items = self.items.read().await;
        let mut all: Vec<Reservation> = items.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.items.read().await.len() as i64)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Reservation) -> AppResult<Reservation> {
        debug!("Creating reservation {}", entity.id);
        let mut items = self.items.write().await;
        if items.contains_key(&entity.id) {
            return Err(AppError::Storage(format!(
                "reservation {} already exists",
                entity.id
            )));
        }
        items.insert(entity.id, entity.clone());
        Ok(entity.clone())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Reservation) -> AppResult<Reservation> {
        debug!("Updating reservation {}", entity.id);
        let mut items = self.items.write().await;
        if !items.contains_key(&entity.id) {
            return Err(AppError::ReservationNotFound(entity.id.to_string()));
        }
        items.insert(entity.id, entity.clone());
        Ok(entity.clone())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        debug!("Deleting reservation {}", id);
        Ok(self.items.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl ReservationRepository for MemoryReservationRepository {
    #[instrument(skip(self))]
    async fn find_active_by_location(&self, location_id: Uuid) -> AppResult<Vec<Reservation>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|r| r.location_id == location_id && r.status.is_active())
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn find_by_status(&self, status: ReservationStatus) -> AppResult<Vec<Reservation>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posada_core::models::LocationKind;

    fn sample(location_id: Uuid) -> Reservation {
        Reservation {
            location_id,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MemoryReservationRepository::new();
        let res = sample(Uuid::new_v4());

        repo.create(&res).await.unwrap();
        let found = repo.find_by_id(res.id).await.unwrap().unwrap();
        assert_eq!(found.id, res.id);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_create_rejected() {
        let repo = MemoryReservationRepository::new();
        let res = sample(Uuid::new_v4());

        repo.create(&res).await.unwrap();
        assert!(repo.create(&res).await.is_err());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = MemoryReservationRepository::new();
        let res = sample(Uuid::new_v4());

        let err = repo.update(&res).await.unwrap_err();
        assert!(matches!(err, AppError::ReservationNotFound(_)));
    }

    #[tokio::test]
    async fn test_active_by_location_excludes_cancelled() {
        let repo = MemoryReservationRepository::new();
        let location_id = Uuid::new_v4();

        let active = sample(location_id);
        let mut cancelled = sample(location_id);
        cancelled.status = ReservationStatus::Cancelled;
        let mut elsewhere = sample(Uuid::new_v4());
        elsewhere.kind = LocationKind::Table;

        repo.create(&active).await.unwrap();
        repo.create(&cancelled).await.unwrap();
        repo.create(&elsewhere).await.unwrap();

        let found = repo.find_active_by_location(location_id).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, active.id);
    }
}

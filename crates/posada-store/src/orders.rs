//! Order repository implementation

use posada_core::{
    models::{Order, OrderStatus},
    traits::{OrderRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

/// In-memory implementation of `OrderRepository`
#[derive(Default)]
pub struct MemoryOrderRepository {
    items: RwLock<HashMap<Uuid, Order>>,
}

impl MemoryOrderRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<Order, Uuid> for MemoryOrderRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        debug!("Finding order by id: {}", id);
        Ok(self.items.read().await.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Order>> {
        let items = self.items.read().await;
        let mut all: Vec<Order> = items.values().cloned().collect();
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
    async fn create(&self, entity: &Order) -> AppResult<Order> {
        debug!("Creating order {}", entity.id);
        let mut items = self.items.write().await;
        if items.contains_key(&entity.id) {
            return Err(AppError::Storage(format!(
                "order {} already exists",
                entity.id
            )));
        }
        items.insert(entity.id, entity.clone());
        Ok(entity.clone())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Order) -> AppResult<Order> {
        debug!("Updating order {}", entity.id);
        let mut items = self.items.write().await;
        if !items.contains_key(&entity.id) {
            return Err(AppError::OrderNotFound(entity.id.to_string()));
        }
        items.insert(entity.id, entity.clone());
        Ok(entity.clone())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        debug!("Deleting order {}", id);
        Ok(self.items.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    #[instrument(skip(self))]
    async fn find_by_location(&self, location_id: Uuid) -> AppResult<Vec<Order>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|o| o.location_id == location_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn find_by_status(&self, status: OrderStatus) -> AppResult<Vec<Order>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_create_find_delete() {
        let repo = MemoryOrderRepository::new();
        let order = Order::new(Uuid::new_v4(), None, dec!(25.00));

        repo.create(&order).await.unwrap();
        assert!(repo.find_by_id(order.id).await.unwrap().is_some());
        assert!(repo.delete(order.id).await.unwrap());
        assert!(repo.find_by_id(order.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_status() {
        let repo = MemoryOrderRepository::new();
        let mut completed = Order::new(Uuid::new_v4(), None, dec!(10.00));
        completed.status = OrderStatus::Completed;
        let pending = Order::new(Uuid::new_v4(), None, dec!(12.00));

        repo.create(&completed).await.unwrap();
        repo.create(&pending).await.unwrap();

        let found = repo.find_by_status(OrderStatus::Completed).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, completed.id);
    }
}

//! Client store collaborator implementation
//!
//! Owns client credit and loyalty point balances. Profile CRUD is the
//! portal's concern; the engine only reads and adjusts balances.

use posada_core::{
    models::{ClientAccount, Reservation},
    traits::ClientStore,
    AppError, AppResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// In-memory implementation of `ClientStore`
#[derive(Default)]
pub struct MemoryClientStore {
    clients: RwLock<HashMap<Uuid, ClientAccount>>,
}

impl MemoryClientStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a client account
    pub async fn upsert(&self, client: ClientAccount) {
        self.clients.write().await.insert(client.id, client);
    }

    /// Fetch a full client account (for tests and seeding)
    pub async fn get(&self, id: Uuid) -> Option<ClientAccount> {
        self.clients.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl ClientStore for MemoryClientStore {
    #[instrument(skip(self))]
    async fn get_client_credit(&self, client_id: Uuid) -> AppResult<Decimal> {
        let clients = self.clients.read().await;
        clients
            .get(&client_id)
            .map(|c| c.credit)
            .ok_or_else(|| AppError::ClientNotFound(client_id.to_string()))
    }

    #[instrument(skip(self))]
    async fn adjust_client_credit(&self, client_id: Uuid, delta: Decimal) -> AppResult<Decimal> {
        let mut clients = self.clients.write().await;
        let client = clients
            .get_mut(&client_id)
            .ok_or_else(|| AppError::ClientNotFound(client_id.to_string()))?;

        let new_credit = client.credit + delta;
        if new_credit < Decimal::ZERO {
            warn!(
                "Credit adjustment would overdraw client {}: {} + {}",
                client_id, client.credit, delta
            );
            return Err(AppError::InsufficientCredit {
                required: delta.abs().to_string(),
                available: client.credit.to_string(),
            });
        }

        client.credit = new_credit;
        debug!("Client {} credit now {}", client_id, new_credit);
        Ok(new_credit)
    }

    #[instrument(skip(self))]
    async fn adjust_client_points(&self, client_id: Uuid, delta: i64) -> AppResult<i64> {
        let mut clients = self.clients.write().await;
        let client = clients
            .get_mut(&client_id)
            .ok_or_else(|| AppError::ClientNotFound(client_id.to_string()))?;

        client.points += delta;
        debug!("Client {} points now {}", client_id, client.points);
        Ok(client.points)
    }

    #[instrument(skip(self, reservation))]
    async fn resolve_client_for_reservation(
        &self,
        reservation: &Reservation,
    ) -> AppResult<Option<Uuid>> {
        // Guest bookings carry no linked profile
        let Some(client_id) = reservation.client_id else {
            return Ok(None);
        };

        let clients = self.clients.read().await;
        Ok(clients.contains_key(&client_id).then_some(client_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_credit_adjustments() {
        let store = MemoryClientStore::new();
        let mut client = ClientAccount::new("Marco");
        client.credit = dec!(40.00);
        let id = client.id;
        store.upsert(client).await;

        assert_eq!(store.get_client_credit(id).await.unwrap(), dec!(40.00));
        assert_eq!(
            store.adjust_client_credit(id, dec!(-15.00)).await.unwrap(),
            dec!(25.00)
        );

        let err = store
            .adjust_client_credit(id, dec!(-30.00))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InsufficientCredit { .. }));
        // Balance unchanged after the rejected overdraw
        assert_eq!(store.get_client_credit(id).await.unwrap(), dec!(25.00));
    }

    #[tokio::test]
    async fn test_points_adjustment() {
        let store = MemoryClientStore::new();
        let client = ClientAccount::new("Lucia");
        let id = client.id;
        store.upsert(client).await;

        assert_eq!(store.adjust_client_points(id, 20).await.unwrap(), 20);
        assert_eq!(store.adjust_client_points(id, -5).await.unwrap(), 15);
    }

    #[tokio::test]
    async fn test_resolve_guest_is_none() {
        let store = MemoryClientStore::new();
        let reservation = Reservation::default();
        assert_eq!(
            store
                .resolve_client_for_reservation(&reservation)
                .await
                .unwrap(),
            None
        );

        // Dangling client reference also resolves to none
        let dangling = Reservation {
            client_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert_eq!(
            store.resolve_client_for_reservation(&dangling).await.unwrap(),
            None
        );
    }
}

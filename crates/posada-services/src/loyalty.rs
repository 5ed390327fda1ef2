//! Loyalty accrual service
//!
//! Computes and grants points when a reservation checks out or an order
//! completes. The accrual itself is idempotency-agnostic: the orchestrator
//! guards against double grants via the points recorded on the entity.

use posada_core::{
    models::{LocationKind, LoyaltyConfig, Order, Reservation},
    traits::{ClientStore, HostSettings},
    AppError, AppResult,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Loyalty accrual service
pub struct LoyaltyService {
    settings: Arc<dyn HostSettings>,
    clients: Arc<dyn ClientStore>,
    host_id: Uuid,
}

impl LoyaltyService {
    /// Create a new loyalty service for a host
    pub fn new(settings: Arc<dyn HostSettings>, clients: Arc<dyn ClientStore>, host_id: Uuid) -> Self {
        Self {
            settings,
            clients,
            host_id,
        }
    }

    /// Points earned by a reservation under a configuration
    fn reservation_points(config: &LoyaltyConfig, reservation: &Reservation) -> i64 {
        match reservation.kind {
            LocationKind::Room => reservation.nights() * config.points_per_night_room,
            LocationKind::Table => config.points_per_table_booking,
        }
    }

    /// Points earned by an order total under a configuration
    ///
    /// Fractional points are floored away.
    fn order_points(config: &LoyaltyConfig, total: Decimal) -> i64 {
        (total * config.points_per_currency_unit)
            .floor()
            .to_i64()
            .unwrap_or(0)
            .max(0)
    }

    /// Grant points for a checked-out reservation
    ///
    /// Returns the points granted and the client they were credited to.
    /// The recipient comes from `resolve_client_for_reservation`, which may
    /// differ from the reservation's own `client_id`; callers compensating
    /// a failed write must roll back against the returned client. Grants
    /// nothing when the program is disabled or no client can be resolved
    /// (guest bookings).
    #[instrument(skip(self, reservation), fields(reservation_id = %reservation.id))]
    pub async fn accrue_reservation(
        &self,
        reservation: &Reservation,
    ) -> AppResult<(i64, Option<Uuid>)> {
        let config = self.settings.get_loyalty_config(self.host_id).await?;
        if !config.enabled {
            debug!("Loyalty program disabled, nothing accrued");
            return Ok((0, None));
        }

        let points = Self::reservation_points(&config, reservation);
        if points <= 0 {
            return Ok((0, None));
        }

        let Some(client_id) = self
            .clients
            .resolve_client_for_reservation(reservation)
            .await?
        else {
            debug!("No client resolved for reservation, accrual skipped");
            return Ok((0, None));
        };

        let balance = self.clients.adjust_client_points(client_id, points).await?;
        info!(
            "Granted {} points to client {} (balance {})",
            points, client_id, balance
        );
        Ok((points, Some(client_id)))
    }

    /// Grant points for a completed order
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn accrue_order(&self, order: &Order) -> AppResult<i64> {
        let config = self.settings.get_loyalty_config(self.host_id).await?;
        if !config.enabled {
            debug!("Loyalty program disabled, nothing accrued");
            return Ok(0);
        }

        let points = Self::order_points(&config, order.total);
        if points <= 0 {
            return Ok(0);
        }

        let Some(client_id) = order.client_id else {
            debug!("Walk-in order, accrual skipped");
            return Ok(0);
        };

        match self.clients.adjust_client_points(client_id, points).await {
            Ok(balance) => {
                info!(
                    "Granted {} points to client {} (balance {})",
                    points, client_id, balance
                );
                Ok(points)
            }
            // A dangling client reference on an order is treated like a
            // guest: skipped, not fatal.
            Err(AppError::ClientNotFound(id)) => {
                warn!("Order references unknown client {}, accrual skipped", id);
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config(enabled: bool) -> LoyaltyConfig {
        LoyaltyConfig {
            enabled,
            points_per_night_room: 10,
            points_per_table_booking: 5,
            points_per_currency_unit: dec!(0.5),
            signup_bonus: 0,
        }
    }

    #[test]
    fn test_room_points_scale_with_nights() {
        let reservation = Reservation {
            kind: LocationKind::Room,
            arrival: chrono::NaiveDate::from_ymd_opt(2024, 7, 20).unwrap(),
            departure: Some(chrono::NaiveDate::from_ymd_opt(2024, 7, 22).unwrap()),
            ..Default::default()
        };
        assert_eq!(
            LoyaltyService::reservation_points(&config(true), &reservation),
            20
        );
    }

    #[test]
    fn test_table_points_are_flat() {
        let reservation = Reservation {
            kind: LocationKind::Table,
            departure: None,
            ..Default::default()
        };
        assert_eq!(
            LoyaltyService::reservation_points(&config(true), &reservation),
            5
        );
    }

    #[test]
    fn test_order_points_floor() {
        let cfg = config(true);
        // 45.50 * 0.5 = 22.75 -> 22
        assert_eq!(LoyaltyService::order_points(&cfg, dec!(45.50)), 22);
        assert_eq!(LoyaltyService::order_points(&cfg, dec!(0.00)), 0);
        assert_eq!(LoyaltyService::order_points(&cfg, dec!(1.99)), 0);
    }

    #[tokio::test]
    async fn test_accrual_reports_credited_client() {
        use posada_core::models::ClientAccount;
        use posada_store::{MemoryClientStore, MemoryHostSettings};

        let clients = Arc::new(MemoryClientStore::new());
        let client = ClientAccount::new("Ana");
        let client_id = client.id;
        clients.upsert(client).await;

        let settings = Arc::new(MemoryHostSettings::new(config(true)));
        let service = LoyaltyService::new(
            settings as Arc<dyn HostSettings>,
            Arc::clone(&clients) as Arc<dyn ClientStore>,
            uuid::Uuid::new_v4(),
        );

        let reservation = Reservation {
            kind: LocationKind::Room,
            client_id: Some(client_id),
            arrival: chrono::NaiveDate::from_ymd_opt(2024, 7, 20).unwrap(),
            departure: Some(chrono::NaiveDate::from_ymd_opt(2024, 7, 22).unwrap()),
            ..Default::default()
        };
        let (points, recipient) = service.accrue_reservation(&reservation).await.unwrap();
        assert_eq!(points, 20);
        assert_eq!(recipient, Some(client_id));
        assert_eq!(clients.get(client_id).await.unwrap().points, 20);

        // A dangling client reference resolves to no recipient
        let stray = Reservation {
            client_id: Some(uuid::Uuid::new_v4()),
            ..reservation
        };
        assert_eq!(service.accrue_reservation(&stray).await.unwrap(), (0, None));
    }
}

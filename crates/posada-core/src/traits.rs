//! Common traits for repositories and external collaborators
//!
//! The engine is storage-agnostic: all persistence goes through the
//! repository traits below, and everything the engine must not duplicate
//! (location catalog, client balances, host settings) is reached through
//! collaborator traits.

use crate::error::AppError;
use crate::models::{
    LocationInfo, LoyaltyConfig, Order, OrderStatus, Reservation, ReservationStatus,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Find all entities with pagination
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<T>, AppError>;

    /// Count total entities
    async fn count(&self) -> Result<i64, AppError>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<T, AppError>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<T, AppError>;

    /// Delete entity by ID
    async fn delete(&self, id: ID) -> Result<bool, AppError>;
}

/// Reservation repository trait with specialized methods
#[async_trait]
pub trait ReservationRepository: Repository<Reservation, Uuid> {
    /// Find non-cancelled reservations for a location
    async fn find_active_by_location(
        &self,
        location_id: Uuid,
    ) -> Result<Vec<Reservation>, AppError>;

    /// Find reservations by status
    async fn find_by_status(
        &self,
        status: ReservationStatus,
    ) -> Result<Vec<Reservation>, AppError>;
}

/// Order repository trait with specialized methods
#[async_trait]
pub trait OrderRepository: Repository<Order, Uuid> {
    /// Find orders for a location
    async fn find_by_location(&self, location_id: Uuid) -> Result<Vec<Order>, AppError>;

    /// Find orders by status
    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, AppError>;
}

/// Location catalog collaborator (read-only)
///
/// Location CRUD belongs to the portal; the engine only looks up the
/// pricing-relevant view of a location.
#[async_trait]
pub trait LocationCatalog: Send + Sync {
    /// Fetch a location by id
    async fn get_location(&self, id: Uuid) -> Result<Option<LocationInfo>, AppError>;
}

/// Client store collaborator
///
/// Owns client credit and loyalty point balances. All balance mutations
/// performed by the engine go through this trait.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Current stored credit for a client
    async fn get_client_credit(&self, client_id: Uuid) -> Result<Decimal, AppError>;

    /// Adjust a client's credit balance by `delta`; returns the new balance
    async fn adjust_client_credit(
        &self,
        client_id: Uuid,
        delta: Decimal,
    ) -> Result<Decimal, AppError>;

    /// Adjust a client's point balance by `delta`; returns the new balance
    async fn adjust_client_points(&self, client_id: Uuid, delta: i64) -> Result<i64, AppError>;

    /// Resolve the client a reservation's loyalty grant should go to
    ///
    /// Returns `None` for guest bookings with no linked profile.
    async fn resolve_client_for_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<Option<Uuid>, AppError>;
}

/// Host settings collaborator
#[async_trait]
pub trait HostSettings: Send + Sync {
    /// Fetch the loyalty configuration for a host
    async fn get_loyalty_config(&self, host_id: Uuid) -> Result<LoyaltyConfig, AppError>;
}

//! Business logic services for Posada
//!
//! This crate contains the reservation and billing engine proper:
//!
//! # Architecture
//!
//! Services are designed to be composable and testable:
//! - Each service owns its dependencies (repositories, collaborators)
//! - Services are wrapped in Arc for safe sharing across async tasks
//! - All operations are instrumented with tracing
//! - Comprehensive error handling with AppError
//!
//! # Services
//!
//! - `CalendarIndex` - per-location booked-interval projection with
//!   overlap queries
//! - `pricing` - pure pricing function over location rules and stay length
//! - `LoyaltyService` - point accrual against the external client store
//! - `LockRegistry` - per-resource async mutexes
//! - `BookingService` - the orchestrator and transaction boundary

pub mod booking;
pub mod calendar;
pub mod locks;
pub mod loyalty;
pub mod pricing;

pub use booking::{BookingService, CreateOrderRequest, CreateReservationRequest, ReservationUpdate};
pub use calendar::CalendarIndex;
pub use locks::LockRegistry;
pub use loyalty::LoyaltyService;

/// Business logic constants
pub mod constants {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Tolerance for floating-point style comparisons against balance due.
    /// A payment may exceed the balance by at most this much.
    pub const PAYMENT_EPSILON: Decimal = dec!(0.01);

    /// Minimum party size accepted on any booking
    pub const MIN_PARTY_SIZE: i32 = 1;

    /// Minimum billable nights (same-day and inverted ranges clamp here)
    pub const MIN_NIGHTS: i64 = 1;
}

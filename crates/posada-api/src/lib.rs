//! API layer for Posada
//!
//! HTTP handlers and DTOs for the reservation and billing engine.

#![forbid(unsafe_code)]

pub mod dto;
pub mod handlers;

// Re-export DTOs (common types)
pub use dto::ApiResponse;

// Re-export handler configuration functions
pub use handlers::{configure_orders, configure_reservations, health};

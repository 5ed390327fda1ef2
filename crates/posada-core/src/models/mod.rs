//! Domain models for Posada
//!
//! This module contains all the core domain models used throughout the
//! booking engine.

pub mod client;
pub mod location;
pub mod loyalty;
pub mod order;
pub mod payment;
pub mod reservation;

pub use client::ClientAccount;
pub use location::{LocationInfo, LocationKind, PricingRule};
pub use loyalty::LoyaltyConfig;
pub use order::{Order, OrderStatus};
pub use payment::{PaymentEntry, PaymentMethod};
pub use reservation::{Reservation, ReservationStatus};

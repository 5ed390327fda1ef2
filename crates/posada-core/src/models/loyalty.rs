//! Loyalty configuration model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Host loyalty program configuration
///
/// Fetched from the host settings collaborator at accrual time. When
/// `enabled` is false, accrual grants nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyConfig {
    /// Master switch for the program
    pub enabled: bool,

    /// Points granted per night for room reservations
    pub points_per_night_room: i64,

    /// Flat points granted per table booking
    pub points_per_table_booking: i64,

    /// Points granted per currency unit spent on completed orders
    /// (the grant is floored to a whole number of points)
    pub points_per_currency_unit: Decimal,

    /// One-time bonus granted on client signup (consumed by the
    /// client-profile layer, carried here for completeness)
    pub signup_bonus: i64,
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            points_per_night_room: 0,
            points_per_table_booking: 0,
            points_per_currency_unit: Decimal::ZERO,
            signup_bonus: 0,
        }
    }
}

//! Location model
//!
//! Read-only view of a bookable location consumed from the external
//! location catalog. Immutable for the duration of a booking decision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of bookable location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    /// Multi-night lodging, booked over a half-open date interval
    #[default]
    Room,
    /// Dining table, booked for a single calendar day
    Table,
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationKind::Room => write!(f, "room"),
            LocationKind::Table => write!(f, "table"),
        }
    }
}

impl LocationKind {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "room" => Some(LocationKind::Room),
            "table" => Some(LocationKind::Table),
            _ => None,
        }
    }
}

/// Pricing rule declared by a location
///
/// A location may declare no rule at all, in which case a prospective
/// booking has no computable total ("price not specified", not zero).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PricingRule {
    /// Charged per night; optionally multiplied by party size
    PerNight { rate: Decimal, per_person: bool },
    /// Flat fee regardless of duration or party size
    FixedFee { fee: Decimal },
}

/// Bookable location entity
///
/// Consumed read-only from the location catalog collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationInfo {
    /// Unique identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Room or table
    pub kind: LocationKind,

    /// Maximum party size, if the location declares one
    pub capacity: Option<i32>,

    /// Pricing rule, if the location declares one
    pub pricing: Option<PricingRule>,

    /// Currency code (ISO 4217)
    pub currency: String,
}

impl LocationInfo {
    /// Check whether a party of the given size fits this location
    pub fn fits_party(&self, party_size: i32) -> bool {
        match self.capacity {
            Some(capacity) => party_size <= capacity,
            None => true,
        }
    }
}

impl Default for LocationInfo {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            kind: LocationKind::Room,
            capacity: None,
            pricing: None,
            currency: "USD".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        assert_eq!(LocationKind::from_str("Room"), Some(LocationKind::Room));
        assert_eq!(LocationKind::from_str("table"), Some(LocationKind::Table));
        assert_eq!(LocationKind::from_str("site"), None);
        assert_eq!(LocationKind::Table.to_string(), "table");
    }

    #[test]
    fn test_fits_party() {
        let location = LocationInfo {
            capacity: Some(4),
            ..Default::default()
        };
        assert!(location.fits_party(4));
        assert!(!location.fits_party(5));

        let unbounded = LocationInfo {
            capacity: None,
            ..Default::default()
        };
        assert!(unbounded.fits_party(100));
    }
}

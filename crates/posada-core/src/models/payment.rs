//! Payment entry model
//!
//! Append-only ledger entries recorded against reservations and orders.
//! Payments are modeled as ledger entries, not processed transactions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment method
///
/// A closed set: an invalid method is a type error, not a runtime string
/// mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    /// Drawn from the client's stored credit balance
    Credit,
    /// Redeemed loyalty points
    Points,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Credit => write!(f, "credit"),
            PaymentMethod::Points => write!(f, "points"),
        }
    }
}

impl PaymentMethod {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            "credit" => Some(PaymentMethod::Credit),
            "points" => Some(PaymentMethod::Points),
            _ => None,
        }
    }

    /// Check whether this method settles against an external client balance
    pub fn draws_on_client(&self) -> bool {
        matches!(self, PaymentMethod::Credit)
    }
}

/// A single payment applied to a reservation or order
///
/// Entries are append-only; the amount applied can never exceed the balance
/// due at application time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEntry {
    /// How the payment was made
    pub method: PaymentMethod,

    /// Amount applied (always > 0)
    pub amount: Decimal,

    /// When the payment was recorded
    pub paid_at: DateTime<Utc>,

    /// Optional free-form note
    pub note: Option<String>,
}

impl PaymentEntry {
    /// Create a new payment entry timestamped now
    pub fn new(method: PaymentMethod, amount: Decimal, note: Option<String>) -> Self {
        Self {
            method,
            amount,
            paid_at: Utc::now(),
            note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_method_round_trip() {
        assert_eq!(PaymentMethod::from_str("Cash"), Some(PaymentMethod::Cash));
        assert_eq!(PaymentMethod::from_str("POINTS"), Some(PaymentMethod::Points));
        assert_eq!(PaymentMethod::from_str("cheque"), None);
    }

    #[test]
    fn test_draws_on_client() {
        assert!(PaymentMethod::Credit.draws_on_client());
        assert!(!PaymentMethod::Cash.draws_on_client());
        assert!(!PaymentMethod::Card.draws_on_client());
    }

    #[test]
    fn test_entry_new() {
        let entry = PaymentEntry::new(PaymentMethod::Card, dec!(25.00), Some("deposit".into()));
        assert_eq!(entry.amount, dec!(25.00));
        assert_eq!(entry.method, PaymentMethod::Card);
        assert_eq!(entry.note.as_deref(), Some("deposit"));
    }
}

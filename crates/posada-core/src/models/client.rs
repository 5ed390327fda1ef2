//! Client account model
//!
//! Minimal view of a client profile as seen by the billing engine: a
//! stored credit balance and a loyalty point balance. Profile CRUD lives
//! with the external client store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client account entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientAccount {
    /// Unique identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Stored credit balance, drawn on by `credit` payments
    pub credit: Decimal,

    /// Loyalty point balance
    pub points: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ClientAccount {
    /// Create a new client account with empty balances
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            credit: Decimal::ZERO,
            points: 0,
            created_at: Utc::now(),
        }
    }

    /// Check whether the stored credit covers an amount
    pub fn can_cover(&self, amount: Decimal) -> bool {
        self.credit >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_can_cover() {
        let mut client = ClientAccount::new("Ana");
        assert!(!client.can_cover(dec!(0.01)));

        client.credit = dec!(50.00);
        assert!(client.can_cover(dec!(50.00)));
        assert!(!client.can_cover(dec!(50.01)));
    }
}

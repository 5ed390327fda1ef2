//! Order model
//!
//! Sibling ledger entity to the reservation: same payment and balance
//! semantics, no date-range overlap semantics. Orders reach loyalty
//! accrual through the `completed` terminal state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::payment::PaymentEntry;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    /// Terminal; triggers loyalty accrual once
    Completed,
    /// Terminal
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Confirmed => write!(f, "confirmed"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl OrderStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Check if this status is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Check whether the edge `self -> next` is legal
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, Confirmed) => true,
            (Confirmed, Completed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier
    pub id: Uuid,

    /// Location the order was placed at
    pub location_id: Uuid,

    /// Linked client profile; `None` for walk-ins
    pub client_id: Option<Uuid>,

    /// Monetary total
    pub total: Decimal,

    /// Sum of applied payments
    pub paid: Decimal,

    /// Lifecycle status
    pub status: OrderStatus,

    /// Append-only payment history
    pub payments: Vec<PaymentEntry>,

    /// Loyalty points granted at completion; `Some` exactly once
    pub points_granted: Option<i64>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new pending order with an empty ledger
    pub fn new(location_id: Uuid, client_id: Option<Uuid>, total: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            location_id,
            client_id,
            total,
            paid: Decimal::ZERO,
            status: OrderStatus::Pending,
            payments: Vec::new(),
            points_granted: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Balance due: `total - paid`
    #[inline]
    pub fn balance(&self) -> Decimal {
        self.total - self.paid
    }

    /// Append a payment entry and recompute the paid total
    pub fn record_payment(&mut self, entry: PaymentEntry) {
        self.paid += entry.amount;
        self.payments.push(entry);
        self.updated_at = Utc::now();
    }

    /// Check whether loyalty points were already granted
    pub fn loyalty_granted(&self) -> bool {
        self.points_granted.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payment::{PaymentEntry, PaymentMethod};
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Confirmed));
    }

    #[test]
    fn test_order_balance() {
        let mut order = Order::new(Uuid::new_v4(), None, dec!(45.50));
        assert_eq!(order.balance(), dec!(45.50));

        order.record_payment(PaymentEntry::new(PaymentMethod::Card, dec!(20.00), None));
        assert_eq!(order.paid, dec!(20.00));
        assert_eq!(order.balance(), dec!(25.50));
    }
}

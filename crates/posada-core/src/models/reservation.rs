//! Reservation model
//!
//! The reservation entity and its lifecycle state machine:
//! `pending -> confirmed -> checked_in -> checked_out`, with `cancelled`
//! reachable from any non-terminal state. Payment entries are append-only
//! and the balance due is always derived as `total - paid`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::location::LocationKind;
use super::payment::PaymentEntry;

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Created, awaiting host confirmation
    #[default]
    Pending,
    /// Confirmed by the host; the interval is committed
    Confirmed,
    /// Guest has arrived
    CheckedIn,
    /// Guest has departed; terminal, triggers loyalty accrual once
    CheckedOut,
    /// Cancelled; terminal, releases the calendar interval
    Cancelled,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationStatus::Pending => write!(f, "pending"),
            ReservationStatus::Confirmed => write!(f, "confirmed"),
            ReservationStatus::CheckedIn => write!(f, "checked_in"),
            ReservationStatus::CheckedOut => write!(f, "checked_out"),
            ReservationStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl ReservationStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ReservationStatus::Pending),
            "confirmed" => Some(ReservationStatus::Confirmed),
            "checked_in" | "checked-in" => Some(ReservationStatus::CheckedIn),
            "checked_out" | "checked-out" => Some(ReservationStatus::CheckedOut),
            "cancelled" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }

    /// Check if this status is terminal (no further transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::CheckedOut | ReservationStatus::Cancelled
        )
    }

    /// Check if the reservation still occupies its calendar interval
    pub fn is_active(&self) -> bool {
        !matches!(self, ReservationStatus::Cancelled)
    }

    /// Check whether the edge `self -> next` is legal
    ///
    /// The forward chain is strict; `cancelled` is reachable from any
    /// non-terminal state.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        match (self, next) {
            (Pending, Confirmed) => true,
            (Confirmed, CheckedIn) => true,
            (CheckedIn, CheckedOut) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// Reservation entity
///
/// Holds the booked interval, the party, the monetary ledger, and the
/// loyalty grant record. The balance due is never stored; it is derived
/// from `total - paid` on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique identifier
    pub id: Uuid,

    /// Booked location
    pub location_id: Uuid,

    /// Location kind at creation time
    pub kind: LocationKind,

    /// Linked client profile; `None` for guest bookings
    pub client_id: Option<Uuid>,

    /// Arrival date (calendar date, no time component)
    pub arrival: NaiveDate,

    /// Departure date; present and strictly after arrival for rooms,
    /// `None` for single-day table bookings
    pub departure: Option<NaiveDate>,

    /// Number of guests
    pub party_size: i32,

    /// Lifecycle status
    pub status: ReservationStatus,

    /// Monetary total; `None` when the location declares no price
    pub total: Option<Decimal>,

    /// Sum of applied payments
    pub paid: Decimal,

    /// Append-only payment history
    pub payments: Vec<PaymentEntry>,

    /// Loyalty points granted at checkout; `Some` exactly once, permanently
    pub points_granted: Option<i64>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Create a new pending reservation with an empty ledger
    pub fn new(
        location_id: Uuid,
        kind: LocationKind,
        client_id: Option<Uuid>,
        arrival: NaiveDate,
        departure: Option<NaiveDate>,
        party_size: i32,
        total: Option<Decimal>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            location_id,
            kind,
            client_id,
            arrival,
            departure,
            party_size,
            status: ReservationStatus::Pending,
            total,
            paid: Decimal::ZERO,
            payments: Vec::new(),
            points_granted: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Balance due: `total - paid`, or `None` when no price is declared
    #[inline]
    pub fn balance(&self) -> Option<Decimal> {
        self.total.map(|total| total - self.paid)
    }

    /// Number of billable nights
    ///
    /// Tables count as one. Zero-or-negative ranges are clamped to one
    /// night (documented source behavior).
    pub fn nights(&self) -> i64 {
        match self.departure {
            Some(departure) => (departure - self.arrival).num_days().max(1),
            None => 1,
        }
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

impl Default for Reservation {
    fn default() -> Self {
        Self::new(
            Uuid::new_v4(),
            LocationKind::Room,
            None,
            Utc::now().date_naive(),
            None,
            1,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payment::PaymentMethod;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_transition_chain() {
        use ReservationStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(CheckedIn));
        assert!(CheckedIn.can_transition_to(CheckedOut));

        assert!(!Pending.can_transition_to(CheckedIn));
        assert!(!Confirmed.can_transition_to(CheckedOut));
        assert!(!CheckedOut.can_transition_to(CheckedIn));
    }

    #[test]
    fn test_cancel_from_non_terminal_only() {
        use ReservationStatus::*;
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(CheckedIn.can_transition_to(Cancelled));
        assert!(!CheckedOut.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn test_terminal_states() {
        assert!(ReservationStatus::CheckedOut.is_terminal());
        assert!(ReservationStatus::Cancelled.is_terminal());
        assert!(!ReservationStatus::CheckedIn.is_terminal());
        assert!(!ReservationStatus::Cancelled.is_active());
        assert!(ReservationStatus::CheckedOut.is_active());
    }

    #[test]
    fn test_balance_derivation() {
        let mut res = Reservation {
            total: Some(dec!(300.00)),
            ..Default::default()
        };
        assert_eq!(res.balance(), Some(dec!(300.00)));

        res.record_payment(PaymentEntry::new(PaymentMethod::Cash, dec!(100.00), None));
        assert_eq!(res.paid, dec!(100.00));
        assert_eq!(res.balance(), Some(dec!(200.00)));
        assert_eq!(res.payments.len(), 1);
    }

    #[test]
    fn test_unpriced_balance_is_none() {
        let res = Reservation::default();
        assert_eq!(res.balance(), None);
    }

    #[test]
    fn test_nights() {
        let two_nights = Reservation {
            arrival: date(2024, 7, 20),
            departure: Some(date(2024, 7, 22)),
            ..Default::default()
        };
        assert_eq!(two_nights.nights(), 2);

        let table = Reservation {
            kind: LocationKind::Table,
            arrival: date(2024, 7, 20),
            departure: None,
            ..Default::default()
        };
        assert_eq!(table.nights(), 1);

        // Same-day ranges clamp to one night
        let same_day = Reservation {
            arrival: date(2024, 7, 20),
            departure: Some(date(2024, 7, 20)),
            ..Default::default()
        };
        assert_eq!(same_day.nights(), 1);
    }
}

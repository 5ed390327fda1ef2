//! Reservation DTOs
//!
//! Request and response types for reservation endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use posada_core::models::{PaymentEntry, Reservation};
use posada_services::{CreateReservationRequest, ReservationUpdate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Reservation creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReservationCreateRequest {
    /// Location to book
    pub location_id: Uuid,

    /// Linked client profile (optional, guest bookings omit it)
    pub client_id: Option<Uuid>,

    /// Arrival date
    pub arrival: NaiveDate,

    /// Departure date (required for rooms, omitted for tables)
    pub departure: Option<NaiveDate>,

    /// Number of guests
    #[serde(default = "default_party_size")]
    #[validate(range(min = 1, max = 100))]
    pub party_size: i32,
}

fn default_party_size() -> i32 {
    1
}

impl ReservationCreateRequest {
    /// Convert to a service-layer request
    pub fn into_request(self) -> CreateReservationRequest {
        CreateReservationRequest {
            location_id: self.location_id,
            client_id: self.client_id,
            arrival: self.arrival,
            departure: self.departure,
            party_size: self.party_size,
        }
    }
}

/// Reservation update request; absent fields are left unchanged
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReservationUpdateRequest {
    /// Move the booking to a different location
    pub location_id: Option<Uuid>,

    /// New arrival date
    pub arrival: Option<NaiveDate>,

    /// New departure date
    pub departure: Option<NaiveDate>,

    /// New party size
    #[validate(range(min = 1, max = 100))]
    pub party_size: Option<i32>,
}

impl ReservationUpdateRequest {
    /// Convert to a service-layer update
    pub fn into_update(self) -> ReservationUpdate {
        ReservationUpdate {
            location_id: self.location_id,
            arrival: self.arrival,
            departure: self.departure,
            party_size: self.party_size,
        }
    }
}

/// Payment request for a reservation or order
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentRequest {
    /// Payment method (cash, card, credit, points)
    #[validate(length(min = 1, message = "Payment method is required"))]
    pub method: String,

    /// Amount to apply
    pub amount: Decimal,

    /// Optional free-form note
    pub note: Option<String>,
}

/// Status transition request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StatusUpdateRequest {
    /// Target status
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

/// Query parameters for listing reservations
///
/// A status filter takes precedence over a location filter; pagination
/// applies to the unfiltered listing.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReservationListParams {
    /// Filter by lifecycle status
    pub status: Option<String>,

    /// Filter to a location's non-cancelled reservations
    pub location_id: Option<Uuid>,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 1000))]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    50
}

impl ReservationListParams {
    /// Calculate offset for the storage query
    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// Get limit for the storage query
    #[inline]
    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Availability query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityParams {
    /// Arrival date
    pub arrival: NaiveDate,

    /// Departure date (rooms)
    pub departure: Option<NaiveDate>,
}

/// Availability response
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub location_id: String,
    pub arrival: NaiveDate,
    pub departure: Option<NaiveDate>,
    pub available: bool,
}

/// Payment entry view
#[derive(Debug, Serialize)]
pub struct PaymentView {
    pub method: String,
    pub amount: Decimal,
    pub paid_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl From<&PaymentEntry> for PaymentView {
    fn from(entry: &PaymentEntry) -> Self {
        Self {
            method: entry.method.to_string(),
            amount: entry.amount,
            paid_at: entry.paid_at,
            note: entry.note.clone(),
        }
    }
}

/// Reservation response DTO
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: String,
    pub location_id: String,
    pub kind: String,
    pub client_id: Option<String>,
    pub arrival: NaiveDate,
    pub departure: Option<NaiveDate>,
    pub party_size: i32,
    pub status: String,
    pub total: Option<Decimal>,
    pub paid: Decimal,
    pub balance: Option<Decimal>,
    pub payments: Vec<PaymentView>,
    pub points_granted: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(res: Reservation) -> Self {
        Self {
            id: res.id.to_string(),
            location_id: res.location_id.to_string(),
            kind: res.kind.to_string(),
            client_id: res.client_id.map(|id| id.to_string()),
            arrival: res.arrival,
            departure: res.departure,
            party_size: res.party_size,
            status: res.status.to_string(),
            total: res.total,
            paid: res.paid,
            balance: res.balance(),
            payments: res.payments.iter().map(PaymentView::from).collect(),
            points_granted: res.points_granted,
            created_at: res.created_at,
            updated_at: res.updated_at,
        }
    }
}

//! Unified error handling for Posada
//!
//! This module provides a comprehensive error type that covers all possible
//! failure scenarios in the booking engine, with automatic HTTP response
//! mapping. Business failures are typed variants, never panics, so calling
//! UIs can render a specific message per kind.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Main application error type
///
/// All errors in the application should be converted to this type.
/// It implements `ResponseError` for automatic HTTP response generation.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Lookup Errors ====================
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    // ==================== Booking Errors ====================
    #[error("Requested dates collide with reservation {conflicting}")]
    DoubleBooking { conflicting: Uuid },

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Party of {party_size} exceeds location capacity of {capacity}")]
    CapacityExceeded { party_size: i32, capacity: i32 },

    // ==================== Payment Errors ====================
    #[error("Invalid payment amount: {0}")]
    InvalidAmount(String),

    #[error("Payment exceeds balance due: requested {requested}, balance {balance}")]
    Overpayment { requested: String, balance: String },

    #[error("Insufficient client credit: required {required}, available {available}")]
    InsufficientCredit { required: String, available: String },

    #[error("Location declares no price: {0}")]
    PriceNotSpecified(String),

    // ==================== Lifecycle Errors ====================
    #[error("Illegal status transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },

    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    // ==================== Internal Errors ====================
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::InvalidDateRange(_)
            | AppError::CapacityExceeded { .. }
            | AppError::InvalidAmount(_)
            | AppError::Validation(_)
            | AppError::MissingField(_) => StatusCode::BAD_REQUEST,

            // 402 Payment Required
            AppError::InsufficientCredit { .. } => StatusCode::PAYMENT_REQUIRED,

            // 404 Not Found
            AppError::LocationNotFound(_)
            | AppError::ClientNotFound(_)
            | AppError::ReservationNotFound(_)
            | AppError::OrderNotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::DoubleBooking { .. } | AppError::IllegalTransition { .. } => {
                StatusCode::CONFLICT
            }

            // 422 Unprocessable Entity
            AppError::Overpayment { .. } | AppError::PriceNotSpecified(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::LocationNotFound(_) => "location_not_found",
            AppError::ClientNotFound(_) => "client_not_found",
            AppError::ReservationNotFound(_) => "reservation_not_found",
            AppError::OrderNotFound(_) => "order_not_found",
            AppError::DoubleBooking { .. } => "double_booking",
            AppError::InvalidDateRange(_) => "invalid_date_range",
            AppError::CapacityExceeded { .. } => "capacity_exceeded",
            AppError::InvalidAmount(_) => "invalid_amount",
            AppError::Overpayment { .. } => "overpayment",
            AppError::InsufficientCredit { .. } => "insufficient_credit",
            AppError::PriceNotSpecified(_) => "price_not_specified",
            AppError::IllegalTransition { .. } => "illegal_transition",
            AppError::Validation(_) => "validation_error",
            AppError::MissingField(_) => "missing_field",
            AppError::Storage(_) => "storage_error",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = json!({
            "error": self.error_code(),
            "message": self.to_string(),
            "status": status.as_u16(),
        });

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::LocationNotFound("abc".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DoubleBooking {
                conflicting: Uuid::nil()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InsufficientCredit {
                required: "10.00".to_string(),
                available: "5.00".to_string()
            }
            .status_code(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            AppError::Overpayment {
                requested: "250".to_string(),
                balance: "200".to_string()
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::IllegalTransition {
                from: "pending".to_string(),
                to: "checked_out".to_string()
            }
            .error_code(),
            "illegal_transition"
        );
        assert_eq!(
            AppError::CapacityExceeded {
                party_size: 5,
                capacity: 4
            }
            .error_code(),
            "capacity_exceeded"
        );
    }
}

//! HTTP request handlers

pub mod order;
pub mod reservation;

pub use order::configure as configure_orders;
pub use reservation::configure as configure_reservations;

use actix_web::HttpResponse;
use serde_json::json;

/// Health check endpoint
///
/// GET /api/v1/health
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "posada",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

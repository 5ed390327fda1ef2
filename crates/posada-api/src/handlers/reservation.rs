//! Reservation handlers
//!
//! HTTP handlers for the booking endpoints: create, read, update, delete,
//! payments, lifecycle transitions, and location availability.

use actix_web::{web, HttpResponse};
use posada_core::{
    models::{PaymentMethod, ReservationStatus},
    AppError,
};
use posada_services::BookingService;
use tracing::{debug, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{
    ApiResponse, AvailabilityParams, AvailabilityResponse, PaymentRequest,
    ReservationCreateRequest, ReservationListParams, ReservationResponse,
    ReservationUpdateRequest, StatusUpdateRequest,
};

/// Create a reservation
///
/// POST /api/v1/reservations
#[instrument(skip(service, payload))]
pub async fn create_reservation(
    service: web::Data<BookingService>,
    payload: web::Json<ReservationCreateRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let reservation = service
        .create_reservation(payload.into_inner().into_request())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        ReservationResponse::from(reservation),
        "Reservation created",
    )))
}

/// List reservations with optional filters, newest first
///
/// GET /api/v1/reservations
#[instrument(skip(service))]
pub async fn list_reservations(
    service: web::Data<BookingService>,
    query: web::Query<ReservationListParams>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    debug!("Listing reservations with filters: {:?}", query);

    let params = query.into_inner();
    let reservations = if let Some(status) = &params.status {
        let status = ReservationStatus::from_str(status)
            .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", status)))?;
        service.list_reservations_by_status(status).await?
    } else if let Some(location_id) = params.location_id {
        service.list_active_by_location(location_id).await?
    } else {
        service
            .list_reservations(params.limit(), params.offset())
            .await?
    };

    let response: Vec<ReservationResponse> =
        reservations.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// Get a reservation by id
///
/// GET /api/v1/reservations/{id}
#[instrument(skip(service))]
pub async fn get_reservation(
    service: web::Data<BookingService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let reservation = service.get_reservation(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ReservationResponse::from(reservation)))
}

/// Update a reservation's dates, location, or party size
///
/// PUT /api/v1/reservations/{id}
#[instrument(skip(service, payload))]
pub async fn update_reservation(
    service: web::Data<BookingService>,
    path: web::Path<Uuid>,
    payload: web::Json<ReservationUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let reservation = service
        .update_reservation(path.into_inner(), payload.into_inner().into_update())
        .await?;
    Ok(HttpResponse::Ok().json(ReservationResponse::from(reservation)))
}

/// Delete a reservation
///
/// DELETE /api/v1/reservations/{id}
#[instrument(skip(service))]
pub async fn delete_reservation(
    service: web::Data<BookingService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    service.delete_reservation(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Apply a payment to a reservation
///
/// POST /api/v1/reservations/{id}/payments
#[instrument(skip(service, payload))]
pub async fn apply_payment(
    service: web::Data<BookingService>,
    path: web::Path<Uuid>,
    payload: web::Json<PaymentRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let request = payload.into_inner();
    let method = PaymentMethod::from_str(&request.method)
        .ok_or_else(|| AppError::Validation(format!("Unknown payment method: {}", request.method)))?;

    let reservation = service
        .apply_payment(path.into_inner(), method, request.amount, request.note)
        .await?;
    Ok(HttpResponse::Ok().json(ReservationResponse::from(reservation)))
}

/// Transition a reservation to a new status
///
/// POST /api/v1/reservations/{id}/status
#[instrument(skip(service, payload))]
pub async fn transition_status(
    service: web::Data<BookingService>,
    path: web::Path<Uuid>,
    payload: web::Json<StatusUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let request = payload.into_inner();
    let status = ReservationStatus::from_str(&request.status)
        .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", request.status)))?;

    let reservation = service.transition_status(path.into_inner(), status).await?;
    Ok(HttpResponse::Ok().json(ReservationResponse::from(reservation)))
}

/// Check whether a location is free for a date range
///
/// GET /api/v1/locations/{id}/availability
#[instrument(skip(service))]
pub async fn query_availability(
    service: web::Data<BookingService>,
    path: web::Path<Uuid>,
    query: web::Query<AvailabilityParams>,
) -> Result<HttpResponse, AppError> {
    let location_id = path.into_inner();
    let params = query.into_inner();
    let available = service
        .query_availability(location_id, params.arrival, params.departure)
        .await?;

    Ok(HttpResponse::Ok().json(AvailabilityResponse {
        location_id: location_id.to_string(),
        arrival: params.arrival,
        departure: params.departure,
        available,
    }))
}

/// Configure reservation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reservations")
            .route("", web::post().to(create_reservation))
            .route("", web::get().to(list_reservations))
            .route("/{id}", web::get().to(get_reservation))
            .route("/{id}", web::put().to(update_reservation))
            .route("/{id}", web::delete().to(delete_reservation))
            .route("/{id}/payments", web::post().to(apply_payment))
            .route("/{id}/status", web::post().to(transition_status)),
    )
    .service(
        web::scope("/locations").route("/{id}/availability", web::get().to(query_availability)),
    );
}

//! Order handlers

use actix_web::{web, HttpResponse};
use posada_core::{
    models::{OrderStatus, PaymentMethod},
    AppError,
};
use posada_services::BookingService;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::dto::{
    ApiResponse, OrderCreateRequest, OrderListParams, OrderResponse, PaymentRequest,
    StatusUpdateRequest,
};

/// Create an order
///
/// POST /api/v1/orders
#[instrument(skip(service, payload))]
pub async fn create_order(
    service: web::Data<BookingService>,
    payload: web::Json<OrderCreateRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let order = service.create_order(payload.into_inner().into_request()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        OrderResponse::from(order),
        "Order created",
    )))
}

/// List orders with optional filters, newest first
///
/// GET /api/v1/orders
#[instrument(skip(service))]
pub async fn list_orders(
    service: web::Data<BookingService>,
    query: web::Query<OrderListParams>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let params = query.into_inner();
    let orders = if let Some(status) = &params.status {
        let status = OrderStatus::from_str(status)
            .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", status)))?;
        service.list_orders_by_status(status).await?
    } else if let Some(location_id) = params.location_id {
        service.list_orders_by_location(location_id).await?
    } else {
        service.list_orders(params.limit(), params.offset()).await?
    };

    let response: Vec<OrderResponse> = orders.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// Get an order by id
///
/// GET /api/v1/orders/{id}
#[instrument(skip(service))]
pub async fn get_order(
    service: web::Data<BookingService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order = service.get_order(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// Apply a payment to an order
///
/// POST /api/v1/orders/{id}/payments
#[instrument(skip(service, payload))]
pub async fn apply_order_payment(
    service: web::Data<BookingService>,
    path: web::Path<Uuid>,
    payload: web::Json<PaymentRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let request = payload.into_inner();
    let method = PaymentMethod::from_str(&request.method)
        .ok_or_else(|| AppError::Validation(format!("Unknown payment method: {}", request.method)))?;

    let order = service
        .apply_order_payment(path.into_inner(), method, request.amount, request.note)
        .await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// Transition an order to a new status
///
/// POST /api/v1/orders/{id}/status
#[instrument(skip(service, payload))]
pub async fn transition_order_status(
    service: web::Data<BookingService>,
    path: web::Path<Uuid>,
    payload: web::Json<StatusUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let request = payload.into_inner();
    let status = OrderStatus::from_str(&request.status)
        .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", request.status)))?;

    let order = service
        .transition_order_status(path.into_inner(), status)
        .await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// Delete an order
///
/// DELETE /api/v1/orders/{id}
#[instrument(skip(service))]
pub async fn delete_order(
    service: web::Data<BookingService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    service.delete_order(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure order routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(create_order))
            .route("", web::get().to(list_orders))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}", web::delete().to(delete_order))
            .route("/{id}/payments", web::post().to(apply_order_payment))
            .route("/{id}/status", web::post().to(transition_order_status)),
    );
}

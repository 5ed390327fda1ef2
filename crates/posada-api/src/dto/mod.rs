//! Request and response DTOs

pub mod common;
pub mod order;
pub mod reservation;

pub use common::ApiResponse;
pub use order::{OrderCreateRequest, OrderListParams, OrderResponse};
pub use reservation::{
    AvailabilityParams, AvailabilityResponse, PaymentRequest, ReservationCreateRequest,
    ReservationListParams, ReservationResponse, ReservationUpdateRequest, StatusUpdateRequest,
};

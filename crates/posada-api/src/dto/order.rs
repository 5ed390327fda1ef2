//! Order DTOs

use chrono::{DateTime, Utc};
use posada_core::models::Order;
use posada_services::CreateOrderRequest;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::reservation::PaymentView;

/// Order creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderCreateRequest {
    /// Location the order is placed at
    pub location_id: Uuid,

    /// Linked client profile (optional, walk-ins omit it)
    pub client_id: Option<Uuid>,

    /// Monetary total
    pub total: Decimal,
}

impl OrderCreateRequest {
    /// Convert to a service-layer request
    pub fn into_request(self) -> CreateOrderRequest {
        CreateOrderRequest {
            location_id: self.location_id,
            client_id: self.client_id,
            total: self.total,
        }
    }
}

/// Query parameters for listing orders
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderListParams {
    /// Filter by lifecycle status
    pub status: Option<String>,

    /// Filter to orders placed at a location
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

impl OrderListParams {
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

/// Order response DTO
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub location_id: String,
    pub client_id: Option<String>,
    pub total: Decimal,
    pub paid: Decimal,
    pub balance: Decimal,
    pub status: String,
    pub payments: Vec<PaymentView>,
    pub points_granted: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_string(),
            location_id: order.location_id.to_string(),
            client_id: order.client_id.map(|id| id.to_string()),
            total: order.total,
            paid: order.paid,
            balance: order.balance(),
            status: order.status.to_string(),
            payments: order.payments.iter().map(PaymentView::from).collect(),
            points_granted: order.points_granted,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_response_serialization() {
        let mut order = Order::new(Uuid::new_v4(), None, dec!(45.50));
        order.paid = dec!(20.00);

        let response = OrderResponse::from(order);
        assert_eq!(response.total, dec!(45.50));
        assert_eq!(response.balance, dec!(25.50));
        assert_eq!(response.status, "pending");

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"pending\""));
        assert!(json.contains("\"total\":\"45.50\""));
        assert!(json.contains("\"balance\":\"25.50\""));
    }
}

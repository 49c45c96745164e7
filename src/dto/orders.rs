use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderItem, OrderStatus};

/// One line item as submitted by the Mini-App. Prices and names are taken
/// as quoted to the customer and snapshotted into the order.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderItemPayload {
    pub product_id: String,
    pub product_name: String,
    pub package_id: String,
    pub weight: f64,
    pub unit: String,
    pub quantity: i32,
    pub price_per_unit: f64,
    pub total_price: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeliverySelection {
    pub district: String,
    pub time_slot: String,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub user_id: i64,
    pub user_name: String,
    pub items: Vec<OrderItemPayload>,
    pub delivery: DeliverySelection,
    #[serde(default)]
    pub promo_code: Option<String>,
    pub total: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Compact row for list views.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummary {
    pub id: i32,
    pub order_number: i32,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub delivery_date: DateTime<Utc>,
    pub contact_name: String,
    pub created_at: DateTime<Utc>,
    pub items_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderSummary>,
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::orders::OrderWithItems;
use crate::models::{OrderStatus, User};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryCreate {
    pub id: String,
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductCreate {
    pub id: String,
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_per_kg: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub stock_quantity: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductUpdate {
    pub category_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_per_kg: Option<f64>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub stock_quantity: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PackageCreate {
    pub product_id: String,
    pub package_code: String,
    pub weight: f64,
    pub unit: String,
    pub price: f64,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PackageUpdate {
    pub package_code: Option<String>,
    pub weight: Option<f64>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub is_available: Option<bool>,
    pub sort_order: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DistrictCreate {
    pub name: String,
    #[serde(default)]
    pub delivery_cost: Option<f64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DistrictUpdate {
    pub name: Option<String>,
    pub delivery_cost: Option<f64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PromoCodeCreate {
    pub code: String,
    #[serde(default)]
    pub discount_percent: Option<f64>,
    #[serde(default)]
    pub discount_amount: Option<f64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub usage_limit: Option<i32>,
    #[serde(default)]
    pub is_gold_code: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PromoCodeUpdate {
    pub code: Option<String>,
    pub discount_percent: Option<f64>,
    pub discount_amount: Option<f64>,
    pub is_active: Option<bool>,
    pub usage_limit: Option<i32>,
    pub is_gold_code: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserUpdate {
    pub phone: Option<String>,
    pub is_gold_client: Option<bool>,
    pub is_blocked: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserStats {
    pub total: i64,
    pub active: i64,
    pub gold_clients: i64,
    pub blocked: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStats {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub avg_order_value: f64,
    pub orders_by_status: HashMap<String, i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromoCodeList {
    pub items: Vec<crate::models::PromoCode>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOrderList {
    pub items: Vec<OrderWithItems>,
}

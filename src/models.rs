use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity;

/// Order lifecycle. Cancellation is allowed from any non-terminal state;
/// forward movement follows the fulfilment sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Delivering,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "preparing" => Some(OrderStatus::Preparing),
            "delivering" => Some(OrderStatus::Delivering),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Confirmed, OrderStatus::Preparing)
                | (OrderStatus::Preparing, OrderStatus::Delivering)
                | (OrderStatus::Delivering, OrderStatus::Delivered)
                | (_, OrderStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed delivery windows offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "morning" => Some(TimeSlot::Morning),
            "afternoon" => Some(TimeSlot::Afternoon),
            "evening" => Some(TimeSlot::Evening),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
        }
    }

    /// Human label used in admin notifications.
    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::Morning => "🌅 Ранок (8:00-12:00)",
            TimeSlot::Afternoon => "☀️ День (12:00-16:00)",
            TimeSlot::Evening => "🌆 Вечір (16:00-20:00)",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: String,
    pub phone: Option<String>,
    pub is_gold_client: bool,
    pub is_blocked: bool,
    pub bot_interactions_count: i32,
    pub first_bot_interaction: Option<DateTime<Utc>>,
    pub last_bot_interaction: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_per_kg: f64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub stock_quantity: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductPackage {
    pub id: i32,
    pub product_id: String,
    pub package_code: String,
    pub weight: f64,
    pub unit: String,
    pub price: f64,
    pub is_available: bool,
    pub sort_order: i32,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct District {
    pub id: i32,
    pub name: String,
    pub delivery_cost: f64,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PromoCode {
    pub id: i32,
    pub code: String,
    pub discount_percent: f64,
    pub discount_amount: f64,
    pub is_active: bool,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub is_gold_code: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub order_number: i32,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub promo_code_used: Option<String>,
    pub discount_amount: f64,
    pub district_id: i32,
    pub delivery_time_slot: TimeSlot,
    pub delivery_date: DateTime<Utc>,
    pub delivery_address: Option<String>,
    pub comment: Option<String>,
    pub contact_name: String,
    pub contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: String,
    pub product_name: String,
    pub package_code: String,
    pub weight: f64,
    pub unit: String,
    pub quantity: i32,
    pub price_per_unit: f64,
    pub total_price: f64,
}

/// Admin account as exposed over the API. The password hash never leaves
/// the entity layer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminUser {
    pub id: i32,
    pub username: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::users::Model> for User {
    fn from(model: entity::users::Model) -> Self {
        User {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            username: model.username,
            language_code: model.language_code,
            phone: model.phone,
            is_gold_client: model.is_gold_client,
            is_blocked: model.is_blocked,
            bot_interactions_count: model.bot_interactions_count,
            first_bot_interaction: model.first_bot_interaction.map(|dt| dt.with_timezone(&Utc)),
            last_bot_interaction: model.last_bot_interaction.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl From<entity::categories::Model> for Category {
    fn from(model: entity::categories::Model) -> Self {
        Category {
            id: model.id,
            name: model.name,
            icon: model.icon,
            sort_order: model.sort_order,
            is_active: model.is_active,
        }
    }
}

impl From<entity::products::Model> for Product {
    fn from(model: entity::products::Model) -> Self {
        Product {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            price_per_kg: model.price_per_kg,
            image_url: model.image_url,
            is_active: model.is_active,
            is_featured: model.is_featured,
            stock_quantity: model.stock_quantity,
        }
    }
}

impl From<entity::product_packages::Model> for ProductPackage {
    fn from(model: entity::product_packages::Model) -> Self {
        ProductPackage {
            id: model.id,
            product_id: model.product_id,
            package_code: model.package_code,
            weight: model.weight,
            unit: model.unit,
            price: model.price,
            is_available: model.is_available,
            sort_order: model.sort_order,
            image_url: model.image_url,
        }
    }
}

impl From<entity::districts::Model> for District {
    fn from(model: entity::districts::Model) -> Self {
        District {
            id: model.id,
            name: model.name,
            delivery_cost: model.delivery_cost,
            is_active: model.is_active,
        }
    }
}

impl From<entity::promo_codes::Model> for PromoCode {
    fn from(model: entity::promo_codes::Model) -> Self {
        PromoCode {
            id: model.id,
            code: model.code,
            discount_percent: model.discount_percent,
            discount_amount: model.discount_amount,
            is_active: model.is_active,
            usage_limit: model.usage_limit,
            usage_count: model.usage_count,
            is_gold_code: model.is_gold_code,
        }
    }
}

impl From<entity::orders::Model> for Order {
    fn from(model: entity::orders::Model) -> Self {
        Order {
            id: model.id,
            order_number: model.order_number,
            user_id: model.user_id,
            status: OrderStatus::parse(&model.status).unwrap_or_default(),
            total_amount: model.total_amount,
            promo_code_used: model.promo_code_used,
            discount_amount: model.discount_amount,
            district_id: model.district_id,
            delivery_time_slot: TimeSlot::from_key(&model.delivery_time_slot)
                .unwrap_or(TimeSlot::Morning),
            delivery_date: model.delivery_date.with_timezone(&Utc),
            delivery_address: model.delivery_address,
            comment: model.comment,
            contact_name: model.contact_name,
            contact_phone: model.contact_phone,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl From<entity::order_items::Model> for OrderItem {
    fn from(model: entity::order_items::Model) -> Self {
        OrderItem {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            product_name: model.product_name,
            package_code: model.package_code,
            weight: model.weight,
            unit: model.unit,
            quantity: model.quantity,
            price_per_unit: model.price_per_unit,
            total_price: model.total_price,
        }
    }
}

impl From<entity::admin_users::Model> for AdminUser {
    fn from(model: entity::admin_users::Model) -> Self {
        AdminUser {
            id: model.id,
            username: model.username,
            is_active: model.is_active,
            last_login: model.last_login.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_follow_fulfilment_order() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Delivering));
        assert!(OrderStatus::Delivering.can_transition_to(OrderStatus::Delivered));

        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivering.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn cancellation_allowed_from_any_pre_terminal_state() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Delivering,
        ] {
            assert!(status.can_transition_to(OrderStatus::Cancelled));
        }
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Delivering,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("shipped"), None);
    }

    #[test]
    fn time_slot_keys_match_checkout_enumeration() {
        assert_eq!(TimeSlot::from_key("morning"), Some(TimeSlot::Morning));
        assert_eq!(TimeSlot::from_key("afternoon"), Some(TimeSlot::Afternoon));
        assert_eq!(TimeSlot::from_key("evening"), Some(TimeSlot::Evening));
        assert_eq!(TimeSlot::from_key("night"), None);
    }
}

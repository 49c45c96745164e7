use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::{
    dto::{
        admin::{
            AdminOrderList, CategoryCreate, CategoryUpdate, DistrictCreate, DistrictUpdate,
            OrderStats, OrderStatusUpdate, PackageCreate, PackageUpdate, ProductCreate,
            ProductUpdate, PromoCodeCreate, PromoCodeList, PromoCodeUpdate, UserList, UserStats,
            UserUpdate,
        },
        orders::OrderWithItems,
        products::{CategoryList, DistrictList, ProductList},
    },
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        districts::{ActiveModel as DistrictActive, Column as DistrictCol, Entity as Districts},
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        product_packages::{ActiveModel as PackageActive, Entity as ProductPackages},
        products::{ActiveModel as ProductActive, Column as ProductCol, Entity as Products},
        promo_codes::{ActiveModel as PromoActive, Column as PromoCol, Entity as PromoCodes},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    models::{
        Category, District, Order, OrderItem, OrderStatus, Product, ProductPackage, PromoCode,
        User,
    },
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, Pagination, SortOrder, StatsQuery},
    state::AppState,
};

// ---------------------------------------------------------------------------
// Categories

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = Categories::find()
        .order_by_asc(CategoryCol::SortOrder)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        CategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_category(
    state: &AppState,
    payload: CategoryCreate,
) -> AppResult<ApiResponse<Category>> {
    let created = CategoryActive {
        id: Set(payload.id),
        name: Set(payload.name),
        icon: Set(payload.icon),
        sort_order: Set(payload.sort_order.unwrap_or(0)),
        is_active: Set(payload.is_active.unwrap_or(true)),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Category created",
        Category::from(created),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    id: String,
    payload: CategoryUpdate,
) -> AppResult<ApiResponse<Category>> {
    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CategoryActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(icon) = payload.icon {
        active.icon = Set(icon);
    }
    if let Some(sort_order) = payload.sort_order {
        active.sort_order = Set(sort_order);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Category updated",
        Category::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    state: &AppState,
    id: String,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::message_only("Category deleted successfully"))
}

// ---------------------------------------------------------------------------
// Products

pub async fn list_products(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, per_page, offset) = pagination.normalize();

    let finder = Products::find()
        .order_by_desc(ProductCol::IsFeatured)
        .order_by_asc(ProductCol::Name);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        ProductList { items },
        Some(Meta::new(page, per_page, total)),
    ))
}

pub async fn get_product(state: &AppState, id: String) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Ok",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn create_product(
    state: &AppState,
    payload: ProductCreate,
) -> AppResult<ApiResponse<Product>> {
    let category = Categories::find_by_id(payload.category_id.clone())
        .one(&state.orm)
        .await?;
    if category.is_none() {
        return Err(AppError::BadRequest("Unknown category".into()));
    }

    let created = ProductActive {
        id: Set(payload.id),
        category_id: Set(payload.category_id),
        name: Set(payload.name),
        description: Set(payload.description),
        price_per_kg: Set(payload.price_per_kg),
        image_url: Set(payload.image_url),
        is_active: Set(payload.is_active.unwrap_or(true)),
        is_featured: Set(payload.is_featured.unwrap_or(false)),
        stock_quantity: Set(payload.stock_quantity),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Product created",
        Product::from(created),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    id: String,
    payload: ProductUpdate,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ProductActive = existing.into();
    if let Some(category_id) = payload.category_id {
        let category = Categories::find_by_id(category_id.clone())
            .one(&state.orm)
            .await?;
        if category.is_none() {
            return Err(AppError::BadRequest("Unknown category".into()));
        }
        active.category_id = Set(category_id);
    }
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price_per_kg) = payload.price_per_kg {
        active.price_per_kg = Set(price_per_kg);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(is_featured) = payload.is_featured {
        active.is_featured = Set(is_featured);
    }
    if let Some(stock_quantity) = payload.stock_quantity {
        active.stock_quantity = Set(Some(stock_quantity));
    }
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Product updated",
        Product::from(updated),
        Some(Meta::empty()),
    ))
}

/// Products referenced by historical orders must never disappear, so
/// deletion is a deactivation.
pub async fn delete_product(
    state: &AppState,
    id: String,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ProductActive = existing.into();
    active.is_active = Set(false);
    active.update(&state.orm).await?;

    Ok(ApiResponse::message_only("Product deactivated successfully"))
}

// ---------------------------------------------------------------------------
// Product packages

pub async fn create_package(
    state: &AppState,
    payload: PackageCreate,
) -> AppResult<ApiResponse<ProductPackage>> {
    let product = Products::find_by_id(payload.product_id.clone())
        .one(&state.orm)
        .await?;
    if product.is_none() {
        return Err(AppError::NotFound);
    }

    let created = PackageActive {
        id: NotSet,
        product_id: Set(payload.product_id),
        package_code: Set(payload.package_code),
        weight: Set(payload.weight),
        unit: Set(payload.unit),
        price: Set(payload.price),
        is_available: Set(payload.is_available.unwrap_or(true)),
        sort_order: Set(payload.sort_order.unwrap_or(0)),
        image_url: Set(payload.image_url),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Package created",
        ProductPackage::from(created),
        Some(Meta::empty()),
    ))
}

pub async fn update_package(
    state: &AppState,
    id: i32,
    payload: PackageUpdate,
) -> AppResult<ApiResponse<ProductPackage>> {
    let existing = ProductPackages::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: PackageActive = existing.into();
    if let Some(package_code) = payload.package_code {
        active.package_code = Set(package_code);
    }
    if let Some(weight) = payload.weight {
        active.weight = Set(weight);
    }
    if let Some(unit) = payload.unit {
        active.unit = Set(unit);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    if let Some(sort_order) = payload.sort_order {
        active.sort_order = Set(sort_order);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Package updated",
        ProductPackage::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_package(state: &AppState, id: i32) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = ProductPackages::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::message_only("Package deleted successfully"))
}

// ---------------------------------------------------------------------------
// Districts

pub async fn list_districts(state: &AppState) -> AppResult<ApiResponse<DistrictList>> {
    let items = Districts::find()
        .order_by_asc(DistrictCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(District::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        DistrictList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_district(
    state: &AppState,
    payload: DistrictCreate,
) -> AppResult<ApiResponse<District>> {
    let created = DistrictActive {
        id: NotSet,
        name: Set(payload.name),
        delivery_cost: Set(payload.delivery_cost.unwrap_or(0.0)),
        is_active: Set(payload.is_active.unwrap_or(true)),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "District created",
        District::from(created),
        Some(Meta::empty()),
    ))
}

pub async fn update_district(
    state: &AppState,
    id: i32,
    payload: DistrictUpdate,
) -> AppResult<ApiResponse<District>> {
    let existing = Districts::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: DistrictActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(delivery_cost) = payload.delivery_cost {
        active.delivery_cost = Set(delivery_cost);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "District updated",
        District::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_district(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Districts::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::message_only("District deleted successfully"))
}

// ---------------------------------------------------------------------------
// Promo codes

pub async fn list_promo_codes(state: &AppState) -> AppResult<ApiResponse<PromoCodeList>> {
    let items = PromoCodes::find()
        .order_by_desc(PromoCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(PromoCode::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        PromoCodeList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_promo_code(
    state: &AppState,
    payload: PromoCodeCreate,
) -> AppResult<ApiResponse<PromoCode>> {
    let created = PromoActive {
        id: NotSet,
        code: Set(payload.code),
        discount_percent: Set(payload.discount_percent.unwrap_or(0.0)),
        discount_amount: Set(payload.discount_amount.unwrap_or(0.0)),
        is_active: Set(payload.is_active.unwrap_or(true)),
        usage_limit: Set(payload.usage_limit),
        usage_count: Set(0),
        is_gold_code: Set(payload.is_gold_code.unwrap_or(false)),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Promo code created",
        PromoCode::from(created),
        Some(Meta::empty()),
    ))
}

pub async fn update_promo_code(
    state: &AppState,
    id: i32,
    payload: PromoCodeUpdate,
) -> AppResult<ApiResponse<PromoCode>> {
    let existing = PromoCodes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: PromoActive = existing.into();
    if let Some(code) = payload.code {
        active.code = Set(code);
    }
    if let Some(discount_percent) = payload.discount_percent {
        active.discount_percent = Set(discount_percent);
    }
    if let Some(discount_amount) = payload.discount_amount {
        active.discount_amount = Set(discount_amount);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(usage_limit) = payload.usage_limit {
        active.usage_limit = Set(Some(usage_limit));
    }
    if let Some(is_gold_code) = payload.is_gold_code {
        active.is_gold_code = Set(is_gold_code);
    }
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Promo code updated",
        PromoCode::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_promo_code(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = PromoCodes::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::message_only("Promo code deleted successfully"))
}

// ---------------------------------------------------------------------------
// Users

pub async fn list_users(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    let (page, per_page, offset) = pagination.normalize();

    let finder = Users::find().order_by_desc(UserCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        UserList { items },
        Some(Meta::new(page, per_page, total)),
    ))
}

pub async fn user_stats(state: &AppState) -> AppResult<ApiResponse<UserStats>> {
    let (total, active, gold_clients, blocked): (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*)::BIGINT,
               COUNT(*) FILTER (WHERE NOT is_blocked)::BIGINT,
               COUNT(*) FILTER (WHERE is_gold_client)::BIGINT,
               COUNT(*) FILTER (WHERE is_blocked)::BIGINT
        FROM users
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Ok",
        UserStats {
            total,
            active,
            gold_clients,
            blocked,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_user(
    state: &AppState,
    id: i64,
    payload: UserUpdate,
) -> AppResult<ApiResponse<User>> {
    let existing = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: UserActive = existing.into();
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(is_gold_client) = payload.is_gold_client {
        active.is_gold_client = Set(is_gold_client);
    }
    if let Some(is_blocked) = payload.is_blocked {
        active.is_blocked = Set(is_blocked);
    }
    active.updated_at = Set(Some(Utc::now().into()));
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "User updated",
        User::from(updated),
        Some(Meta::empty()),
    ))
}

// ---------------------------------------------------------------------------
// Orders

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<AdminOrderList>> {
    let (page, per_page, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }
    if let Some(order_number) = query.order_number {
        condition = condition.add(OrderCol::OrderNumber.eq(order_number));
    }
    if let Some(start) = query.start_date.as_deref().and_then(parse_date_bound) {
        condition = condition.add(OrderCol::CreatedAt.gte(start));
    }
    if let Some(end) = query.end_date.as_deref().and_then(parse_date_bound_end) {
        condition = condition.add(OrderCol::CreatedAt.lte(end));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    // One query for the page's items instead of one per order.
    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let mut items_by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    if !order_ids.is_empty() {
        for item in OrderItems::find()
            .filter(OrderItemCol::OrderId.is_in(order_ids))
            .all(&state.orm)
            .await?
        {
            items_by_order
                .entry(item.order_id)
                .or_default()
                .push(OrderItem::from(item));
        }
    }

    let items = orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems {
                order: Order::from(order),
                items,
            }
        })
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        AdminOrderList { items },
        Some(Meta::new(page, per_page, total)),
    ))
}

pub async fn get_order(state: &AppState, id: i32) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = order
        .find_related(OrderItems)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        OrderWithItems {
            order: Order::from(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    id: i32,
    payload: OrderStatusUpdate,
) -> AppResult<ApiResponse<Order>> {
    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let current = OrderStatus::parse(&existing.status)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("corrupt order status")))?;
    if !current.can_transition_to(payload.status) {
        return Err(AppError::BadRequest(format!(
            "Invalid status transition {current} -> {}",
            payload.status
        )));
    }

    let mut active: OrderActive = existing.into();
    active.status = Set(payload.status.as_str().to_string());
    active.updated_at = Set(Some(Utc::now().into()));
    let updated = active.update(&state.orm).await?;

    tracing::info!(order_id = id, status = %payload.status, "order status updated");

    Ok(ApiResponse::success(
        "Order updated",
        Order::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn order_stats(
    state: &AppState,
    query: StatsQuery,
) -> AppResult<ApiResponse<OrderStats>> {
    let start = query.start_date.as_deref().and_then(parse_date_bound);
    let end = query.end_date.as_deref().and_then(parse_date_bound_end);

    let (total_orders, total_revenue): (i64, f64) = sqlx::query_as(
        r#"
        SELECT COUNT(*)::BIGINT, COALESCE(SUM(total_amount), 0)
        FROM orders
        WHERE ($1::timestamptz IS NULL OR created_at >= $1)
          AND ($2::timestamptz IS NULL OR created_at <= $2)
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_one(&state.pool)
    .await?;

    let by_status: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT status, COUNT(*)::BIGINT
        FROM orders
        WHERE ($1::timestamptz IS NULL OR created_at >= $1)
          AND ($2::timestamptz IS NULL OR created_at <= $2)
        GROUP BY status
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(&state.pool)
    .await?;

    let avg_order_value = if total_orders > 0 {
        total_revenue / total_orders as f64
    } else {
        0.0
    };

    Ok(ApiResponse::success(
        "Ok",
        OrderStats {
            total_orders,
            total_revenue,
            avg_order_value,
            orders_by_status: by_status.into_iter().collect(),
        },
        Some(Meta::empty()),
    ))
}

// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp; anything else is
// treated as "no bound" rather than an error.
fn parse_date_bound(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

fn parse_date_bound_end(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_bounds_cover_the_whole_end_day() {
        let start = parse_date_bound("2024-03-01").unwrap();
        let end = parse_date_bound_end("2024-03-01").unwrap();
        assert_eq!(start.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-03-01T23:59:59+00:00");
    }

    #[test]
    fn garbage_dates_are_ignored() {
        assert_eq!(parse_date_bound("yesterday"), None);
        assert_eq!(parse_date_bound_end("03/01/2024"), None);
    }

    #[test]
    fn rfc3339_timestamps_are_accepted() {
        let bound = parse_date_bound("2024-03-01T12:30:00+02:00").unwrap();
        assert_eq!(bound.to_rfc3339(), "2024-03-01T10:30:00+00:00");
    }
}

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};

use crate::{
    dto::{
        admin::{
            AdminOrderList, CategoryCreate, CategoryUpdate, DistrictCreate, DistrictUpdate,
            OrderStats, OrderStatusUpdate, PackageCreate, PackageUpdate, ProductCreate,
            ProductUpdate, PromoCodeCreate, PromoCodeList, PromoCodeUpdate, UserList, UserStats,
            UserUpdate,
        },
        auth::{AdminLogin, LoginResponse, TokenRefresh, TokenResponse},
        orders::OrderWithItems,
        products::{CategoryList, DistrictList, ProductList},
    },
    error::AppResult,
    middleware::auth::AdminAuth,
    models::{AdminUser, Category, District, Order, Product, ProductPackage, PromoCode, User},
    response::ApiResponse,
    routes::params::{OrderListQuery, Pagination, StatsQuery},
    services::{admin_service, auth_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/me", get(me))
        // Categories
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", put(update_category).delete(delete_category))
        // Products
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        // Packages
        .route("/packages", post(create_package))
        .route("/packages/{id}", put(update_package).delete(delete_package))
        // Districts
        .route("/districts", get(list_districts).post(create_district))
        .route("/districts/{id}", put(update_district).delete(delete_district))
        // Promo codes
        .route("/promo-codes", get(list_promo_codes).post(create_promo_code))
        .route(
            "/promo-codes/{id}",
            put(update_promo_code).delete(delete_promo_code),
        )
        // Users
        .route("/users", get(list_users))
        .route("/users/stats", get(user_stats))
        .route("/users/{id}", put(update_user))
        // Orders
        .route("/orders", get(list_orders))
        .route("/orders/stats", get(order_stats))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", put(update_order_status))
}

// ---------------------------------------------------------------------------
// Auth

#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    request_body = AdminLogin,
    responses(
        (status = 200, description = "JWT token pair", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Incorrect username or password")
    ),
    tag = "Admin Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<AdminLogin>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = auth_service::login(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/refresh",
    request_body = TokenRefresh,
    responses(
        (status = 200, description = "Fresh token pair", body = ApiResponse<TokenResponse>),
        (status = 400, description = "Invalid or expired refresh token")
    ),
    tag = "Admin Auth"
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<TokenRefresh>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let resp = auth_service::refresh(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/logout",
    responses((status = 200, description = "Logged out")),
    security(("bearer_auth" = [])),
    tag = "Admin Auth"
)]
pub async fn logout(_admin: AdminAuth) -> Json<ApiResponse<serde_json::Value>> {
    // Tokens are stateless; the client discards them.
    Json(ApiResponse::message_only("Successfully logged out"))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/me",
    responses(
        (status = 200, description = "Current admin", body = ApiResponse<AdminUser>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Auth"
)]
pub async fn me(
    State(state): State<AppState>,
    admin: AdminAuth,
) -> AppResult<Json<ApiResponse<AdminUser>>> {
    let resp = auth_service::me(&state, admin.admin_id).await?;
    Ok(Json(resp))
}

// ---------------------------------------------------------------------------
// Categories

#[utoipa::path(get, path = "/api/v1/admin/categories", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn list_categories(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = admin_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/categories",
    request_body = CategoryCreate,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<Category>),
        (status = 400, description = "Duplicate category id")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = admin_service::create_category(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(put, path = "/api/v1/admin/categories/{id}", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn update_category(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = admin_service::update_category(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(delete, path = "/api/v1/admin/categories/{id}", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn delete_category(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_category(&state, id).await?;
    Ok(Json(resp))
}

// ---------------------------------------------------------------------------
// Products

#[utoipa::path(
    get,
    path = "/api/v1/admin/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Paginated products", body = ApiResponse<ProductList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_products(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = admin_service::list_products(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/v1/admin/products/{id}", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn get_product(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = admin_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/products",
    request_body = ProductCreate,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<Product>),
        (status = 400, description = "Unknown category or duplicate id")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = admin_service::create_product(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(put, path = "/api/v1/admin/products/{id}", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn update_product(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = admin_service::update_product(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/products/{id}",
    responses(
        (status = 200, description = "Product deactivated"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_product(&state, id).await?;
    Ok(Json(resp))
}

// ---------------------------------------------------------------------------
// Packages

#[utoipa::path(
    post,
    path = "/api/v1/admin/packages",
    request_body = PackageCreate,
    responses(
        (status = 200, description = "Package created", body = ApiResponse<ProductPackage>),
        (status = 400, description = "Duplicate package code for product"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_package(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(payload): Json<PackageCreate>,
) -> AppResult<Json<ApiResponse<ProductPackage>>> {
    let resp = admin_service::create_package(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(put, path = "/api/v1/admin/packages/{id}", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn update_package(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<i32>,
    Json(payload): Json<PackageUpdate>,
) -> AppResult<Json<ApiResponse<ProductPackage>>> {
    let resp = admin_service::update_package(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(delete, path = "/api/v1/admin/packages/{id}", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn delete_package(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_package(&state, id).await?;
    Ok(Json(resp))
}

// ---------------------------------------------------------------------------
// Districts

#[utoipa::path(get, path = "/api/v1/admin/districts", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn list_districts(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> AppResult<Json<ApiResponse<DistrictList>>> {
    let resp = admin_service::list_districts(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/districts",
    request_body = DistrictCreate,
    responses(
        (status = 200, description = "District created", body = ApiResponse<District>),
        (status = 400, description = "Duplicate district name")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_district(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(payload): Json<DistrictCreate>,
) -> AppResult<Json<ApiResponse<District>>> {
    let resp = admin_service::create_district(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(put, path = "/api/v1/admin/districts/{id}", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn update_district(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<i32>,
    Json(payload): Json<DistrictUpdate>,
) -> AppResult<Json<ApiResponse<District>>> {
    let resp = admin_service::update_district(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(delete, path = "/api/v1/admin/districts/{id}", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn delete_district(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_district(&state, id).await?;
    Ok(Json(resp))
}

// ---------------------------------------------------------------------------
// Promo codes

#[utoipa::path(get, path = "/api/v1/admin/promo-codes", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn list_promo_codes(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> AppResult<Json<ApiResponse<PromoCodeList>>> {
    let resp = admin_service::list_promo_codes(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/promo-codes",
    request_body = PromoCodeCreate,
    responses(
        (status = 200, description = "Promo code created", body = ApiResponse<PromoCode>),
        (status = 400, description = "Duplicate code")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_promo_code(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(payload): Json<PromoCodeCreate>,
) -> AppResult<Json<ApiResponse<PromoCode>>> {
    let resp = admin_service::create_promo_code(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(put, path = "/api/v1/admin/promo-codes/{id}", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn update_promo_code(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<i32>,
    Json(payload): Json<PromoCodeUpdate>,
) -> AppResult<Json<ApiResponse<PromoCode>>> {
    let resp = admin_service::update_promo_code(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(delete, path = "/api/v1/admin/promo-codes/{id}", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn delete_promo_code(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_promo_code(&state, id).await?;
    Ok(Json(resp))
}

// ---------------------------------------------------------------------------
// Users

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Paginated users", body = ApiResponse<UserList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = admin_service::list_users(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/v1/admin/users/stats", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn user_stats(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> AppResult<Json<ApiResponse<UserStats>>> {
    let resp = admin_service::user_stats(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}",
    request_body = UserUpdate,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<User>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_user(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = admin_service::update_user(&state, id, payload).await?;
    Ok(Json(resp))
}

// ---------------------------------------------------------------------------
// Orders

#[utoipa::path(
    get,
    path = "/api/v1/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("order_number" = Option<i32>, Query, description = "Exact order number"),
        ("start_date" = Option<String>, Query, description = "Created on or after, YYYY-MM-DD"),
        ("end_date" = Option<String>, Query, description = "Created on or before, YYYY-MM-DD"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Paginated orders with items", body = ApiResponse<AdminOrderList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<AdminOrderList>>> {
    let resp = admin_service::list_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/orders/stats",
    params(
        ("start_date" = Option<String>, Query, description = "Created on or after, YYYY-MM-DD"),
        ("end_date" = Option<String>, Query, description = "Created on or before, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Order statistics", body = ApiResponse<OrderStats>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn order_stats(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<ApiResponse<OrderStats>>> {
    let resp = admin_service::order_stats(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Any order with items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_order(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = admin_service::get_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/orders/{id}/status",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = OrderStatusUpdate,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<Order>),
        (status = 400, description = "Invalid status transition"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<i32>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::update_order_status(&state, id, payload).await?;
    Ok(Json(resp))
}

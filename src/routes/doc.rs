use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{
            AdminOrderList, CategoryCreate, CategoryUpdate, DistrictCreate, DistrictUpdate,
            OrderStats, OrderStatusUpdate, PackageCreate, PackageUpdate, ProductCreate,
            ProductUpdate, PromoCodeCreate, PromoCodeList, PromoCodeUpdate, UserList, UserStats,
            UserUpdate,
        },
        auth::{AdminLogin, LoginResponse, TokenRefresh, TokenResponse},
        orders::{CreateOrderRequest, OrderList, OrderSummary, OrderWithItems},
        products::{
            CategoryList, DistrictList, PackageList, ProductDetail, ProductList,
            PromoValidateRequest, PromoValidateResponse,
        },
    },
    models::{
        AdminUser, Category, District, Order, OrderItem, OrderStatus, Product, ProductPackage,
        PromoCode, TimeSlot, User,
    },
    response::{ApiResponse, Meta},
    routes::{admin, bot, categories, districts, health, orders, params, products, promo},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        // Mini-App init data travels as `Authorization: tma <init-data>`.
        components.add_security_scheme(
            "tma_auth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        categories::list_categories,
        categories::category_products,
        products::list_products,
        products::get_product,
        products::product_packages,
        districts::list_districts,
        promo::validate_code,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        bot::record_interaction,
        bot::bot_stats,
        admin::login,
        admin::refresh,
        admin::logout,
        admin::me,
        admin::list_categories,
        admin::create_category,
        admin::update_category,
        admin::delete_category,
        admin::list_products,
        admin::get_product,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
        admin::create_package,
        admin::update_package,
        admin::delete_package,
        admin::list_districts,
        admin::create_district,
        admin::update_district,
        admin::delete_district,
        admin::list_promo_codes,
        admin::create_promo_code,
        admin::update_promo_code,
        admin::delete_promo_code,
        admin::list_users,
        admin::user_stats,
        admin::update_user,
        admin::list_orders,
        admin::order_stats,
        admin::get_order,
        admin::update_order_status
    ),
    components(
        schemas(
            User,
            Category,
            Product,
            ProductPackage,
            District,
            PromoCode,
            Order,
            OrderItem,
            OrderStatus,
            TimeSlot,
            AdminUser,
            AdminLogin,
            LoginResponse,
            TokenRefresh,
            TokenResponse,
            CreateOrderRequest,
            OrderWithItems,
            OrderSummary,
            OrderList,
            AdminOrderList,
            CategoryList,
            ProductList,
            ProductDetail,
            PackageList,
            DistrictList,
            PromoValidateRequest,
            PromoValidateResponse,
            CategoryCreate,
            CategoryUpdate,
            ProductCreate,
            ProductUpdate,
            PackageCreate,
            PackageUpdate,
            DistrictCreate,
            DistrictUpdate,
            PromoCodeCreate,
            PromoCodeUpdate,
            PromoCodeList,
            UserUpdate,
            UserList,
            UserStats,
            OrderStatusUpdate,
            OrderStats,
            bot::BotUserPayload,
            bot::BotInteractionRequest,
            bot::BotInteractionResponse,
            bot::BotStatsResponse,
            params::Pagination,
            params::ProductsQuery,
            params::OrderListQuery,
            Meta
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Categories, products, packages and districts"),
        (name = "Promo", description = "Promo code validation"),
        (name = "Orders", description = "Customer order endpoints"),
        (name = "Bot", description = "Bot interaction tracking"),
        (name = "Admin Auth", description = "Admin authentication"),
        (name = "Admin", description = "Admin CRUD endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

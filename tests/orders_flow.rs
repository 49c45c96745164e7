use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use seafood_store_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool},
    dto::orders::{CreateOrderRequest, DeliverySelection, OrderItemPayload},
    entity::{
        categories::{ActiveModel as CategoryActive, Entity as Categories},
        districts::{ActiveModel as DistrictActive, Column as DistrictCol, Entity as Districts},
        orders::{Column as OrderCol, Entity as Orders},
        product_packages::{ActiveModel as PackageActive, Column as PackageCol, Entity as Packages},
        products::{ActiveModel as ProductActive, Entity as Products},
        promo_codes::{ActiveModel as PromoActive, Column as PromoCol, Entity as PromoCodes},
        users::{ActiveModel as UserActive, Entity as Users, Model as UserModel},
    },
    error::AppError,
    middleware::auth::Buyer,
    models::OrderStatus,
    notify::Notifier,
    services::order_service,
    state::AppState,
};

// Integration flows against a real database. Set TEST_DATABASE_URL (or
// DATABASE_URL) to run; tests are skipped otherwise. Each test works on its
// own user/district/promo so they can run in parallel and repeatedly.

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let config = AppConfig {
        database_url: database_url.clone(),
        host: "127.0.0.1".into(),
        port: 0,
        bot_token: "test-bot-token".into(),
        jwt_secret: "test-jwt-secret".into(),
        admin_chat_id: None,
        cors_origins: vec!["*".into()],
        business_utc_offset_hours: 2,
        notifications_enabled: false,
        telegram_api_base: "http://localhost".into(),
    };

    let pool = create_pool(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    let orm = create_orm_conn(&database_url).await?;
    let notifier = Notifier::new(&config)?;

    Ok(Some(AppState {
        pool,
        orm,
        config,
        notifier,
    }))
}

async fn ensure_user(state: &AppState, id: i64) -> anyhow::Result<UserModel> {
    if let Some(user) = Users::find_by_id(id).one(&state.orm).await? {
        return Ok(user);
    }
    Ok(UserActive {
        id: Set(id),
        first_name: Set("Тест".into()),
        last_name: Set(None),
        username: Set(Some(format!("tester_{id}"))),
        language_code: Set("uk".into()),
        phone: Set(Some("+380501112233".into())),
        is_gold_client: Set(false),
        is_blocked: Set(false),
        bot_interactions_count: Set(0),
        first_bot_interaction: Set(None),
        last_bot_interaction: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?)
}

async fn ensure_district(state: &AppState, name: &str) -> anyhow::Result<()> {
    let existing = Districts::find()
        .filter(DistrictCol::Name.eq(name))
        .one(&state.orm)
        .await?;
    if existing.is_none() {
        DistrictActive {
            id: NotSet,
            name: Set(name.into()),
            delivery_cost: Set(0.0),
            is_active: Set(true),
        }
        .insert(&state.orm)
        .await?;
    }
    Ok(())
}

async fn ensure_salmon_product(state: &AppState) -> anyhow::Result<()> {
    if Categories::find_by_id("fish").one(&state.orm).await?.is_none() {
        CategoryActive {
            id: Set("fish".into()),
            name: Set("Риба".into()),
            icon: Set("🐟".into()),
            sort_order: Set(1),
            is_active: Set(true),
        }
        .insert(&state.orm)
        .await?;
    }

    if Products::find_by_id("salmon").one(&state.orm).await?.is_none() {
        ProductActive {
            id: Set("salmon".into()),
            category_id: Set("fish".into()),
            name: Set("salmon".into()),
            description: Set(None),
            price_per_kg: Set(500.0),
            image_url: Set(None),
            is_active: Set(true),
            is_featured: Set(false),
            stock_quantity: Set(None),
        }
        .insert(&state.orm)
        .await?;
    }

    let package = Packages::find()
        .filter(PackageCol::ProductId.eq("salmon"))
        .filter(PackageCol::PackageCode.eq("1kg"))
        .one(&state.orm)
        .await?;
    if package.is_none() {
        PackageActive {
            id: NotSet,
            product_id: Set("salmon".into()),
            package_code: Set("1kg".into()),
            weight: Set(1.0),
            unit: Set("кг".into()),
            price: Set(500.0),
            is_available: Set(true),
            sort_order: Set(1),
            image_url: Set(None),
        }
        .insert(&state.orm)
        .await?;
    }

    Ok(())
}

fn salmon_order(user_id: i64, district: &str, promo_code: Option<&str>) -> CreateOrderRequest {
    CreateOrderRequest {
        user_id,
        user_name: "Тест Покупець".into(),
        items: vec![OrderItemPayload {
            product_id: "salmon".into(),
            product_name: "salmon".into(),
            package_id: "1kg".into(),
            weight: 1.0,
            unit: "кг".into(),
            quantity: 1,
            price_per_unit: 500.0,
            total_price: 500.0,
        }],
        delivery: DeliverySelection {
            district: district.into(),
            time_slot: "morning".into(),
            comment: None,
        },
        promo_code: promo_code.map(Into::into),
        total: 500.0,
    }
}

#[tokio::test]
async fn create_order_happy_path() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user = ensure_user(&state, 910_000_001).await?;
    ensure_district(&state, "Центр").await?;
    ensure_salmon_product(&state).await?;
    let buyer = Buyer { user };

    let resp =
        order_service::create_order(&state, &buyer, salmon_order(910_000_001, "Центр", None))
            .await?;

    let data = resp.data.expect("order payload");
    assert_eq!(data.order.status, OrderStatus::Pending);
    assert!(data.order.order_number >= 100);
    assert_eq!(data.order.total_amount, 500.0);
    assert_eq!(data.order.discount_amount, 0.0);
    assert_eq!(data.order.contact_name, "Тест Покупець");
    assert_eq!(data.items.len(), 1);
    assert_eq!(data.items[0].total_price, 500.0);

    // Total invariant: sum of item totals minus discount, to the cent.
    let item_sum: f64 = data.items.iter().map(|i| i.total_price).sum();
    assert!((data.order.total_amount - (item_sum - data.order.discount_amount)).abs() < 0.005);

    Ok(())
}

#[tokio::test]
async fn unknown_district_writes_nothing() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user = ensure_user(&state, 910_000_002).await?;
    ensure_salmon_product(&state).await?;
    let buyer = Buyer { user };

    let result = order_service::create_order(
        &state,
        &buyer,
        salmon_order(910_000_002, "Неіснуючий район", None),
    )
    .await;

    match result {
        Err(AppError::BadRequest(message)) => assert!(message.contains("Invalid district")),
        other => panic!("expected BadRequest, got {other:?}"),
    }

    let written = Orders::find()
        .filter(OrderCol::UserId.eq(910_000_002_i64))
        .count(&state.orm)
        .await?;
    assert_eq!(written, 0, "no order rows may survive a failed validation");

    Ok(())
}

#[tokio::test]
async fn exhausted_promo_rejects_order_and_keeps_count() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user = ensure_user(&state, 910_000_003).await?;
    ensure_district(&state, "Поділ-Тест").await?;
    ensure_salmon_product(&state).await?;
    let buyer = Buyer { user };

    // Pin the promo at its limit regardless of previous runs.
    let promo = PromoCodes::find()
        .filter(PromoCol::Code.eq("USEDUP"))
        .one(&state.orm)
        .await?;
    match promo {
        Some(promo) => {
            let mut active: PromoActive = promo.into();
            active.usage_limit = Set(Some(1));
            active.usage_count = Set(1);
            active.update(&state.orm).await?;
        }
        None => {
            PromoActive {
                id: NotSet,
                code: Set("USEDUP".into()),
                discount_percent: Set(10.0),
                discount_amount: Set(0.0),
                is_active: Set(true),
                usage_limit: Set(Some(1)),
                usage_count: Set(1),
                is_gold_code: Set(false),
            }
            .insert(&state.orm)
            .await?;
        }
    }

    let result = order_service::create_order(
        &state,
        &buyer,
        salmon_order(910_000_003, "Поділ-Тест", Some("USEDUP")),
    )
    .await;

    match result {
        Err(AppError::BadRequest(message)) => {
            assert!(message.contains("Promo code usage limit exceeded"));
        }
        other => panic!("expected BadRequest, got {other:?}"),
    }

    let promo = PromoCodes::find()
        .filter(PromoCol::Code.eq("USEDUP"))
        .one(&state.orm)
        .await?
        .expect("promo still present");
    assert_eq!(promo.usage_count, 1, "rejected redemption must not consume usage");

    let written = Orders::find()
        .filter(OrderCol::UserId.eq(910_000_003_i64))
        .count(&state.orm)
        .await?;
    assert_eq!(written, 0);

    Ok(())
}

#[tokio::test]
async fn gold_promo_discounts_and_promotes_the_buyer() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user = ensure_user(&state, 910_000_004).await?;
    ensure_district(&state, "Оболонь-Тест").await?;
    ensure_salmon_product(&state).await?;

    // Fresh gold code, 10% off.
    let promo = PromoCodes::find()
        .filter(PromoCol::Code.eq("GOLDFLOW"))
        .one(&state.orm)
        .await?;
    let usage_before = match promo {
        Some(promo) => promo.usage_count,
        None => {
            PromoActive {
                id: NotSet,
                code: Set("GOLDFLOW".into()),
                discount_percent: Set(10.0),
                discount_amount: Set(0.0),
                is_active: Set(true),
                usage_limit: Set(None),
                usage_count: Set(0),
                is_gold_code: Set(true),
            }
            .insert(&state.orm)
            .await?;
            0
        }
    };

    let buyer = Buyer { user };
    let resp = order_service::create_order(
        &state,
        &buyer,
        salmon_order(910_000_004, "Оболонь-Тест", Some("GOLDFLOW")),
    )
    .await?;

    let data = resp.data.expect("order payload");
    assert_eq!(data.order.discount_amount, 50.0);
    assert_eq!(data.order.total_amount, 450.0);
    assert_eq!(data.order.promo_code_used.as_deref(), Some("GOLDFLOW"));

    let promo = PromoCodes::find()
        .filter(PromoCol::Code.eq("GOLDFLOW"))
        .one(&state.orm)
        .await?
        .expect("promo present");
    assert_eq!(promo.usage_count, usage_before + 1);

    let user = Users::find_by_id(910_000_004_i64)
        .one(&state.orm)
        .await?
        .expect("user present");
    assert!(user.is_gold_client, "gold code must promote the buyer");

    Ok(())
}

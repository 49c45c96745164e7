use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};

use crate::{
    dto::orders::{CreateOrderRequest, OrderList, OrderSummary, OrderWithItems},
    entity::{
        districts::{Column as DistrictCol, Entity as Districts},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        products::{Column as ProductCol, Entity as Products},
        promo_codes::{ActiveModel as PromoActive, Column as PromoCol, Entity as PromoCodes},
        users::ActiveModel as UserActive,
    },
    error::{AppError, AppResult},
    middleware::auth::Buyer,
    models::{Order, OrderItem, OrderStatus, TimeSlot},
    response::{ApiResponse, Meta},
    services::promo_service,
    state::AppState,
};

/// Orders placed before this hour (business time) are delivered tomorrow;
/// later orders slip one more day.
const DELIVERY_CUTOFF_HOUR: u32 = 18;

/// Floor for the human-facing order sequence, kept clear of small internal
/// ids.
const FIRST_ORDER_NUMBER: i32 = 100;

pub async fn create_order(
    state: &AppState,
    buyer: &Buyer,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest(
            "Order must contain at least one item".into(),
        ));
    }

    let district = Districts::find()
        .filter(
            Condition::all()
                .add(DistrictCol::Name.eq(payload.delivery.district.clone()))
                .add(DistrictCol::IsActive.eq(true)),
        )
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid district".into()))?;

    let time_slot = TimeSlot::from_key(&payload.delivery.time_slot)
        .ok_or_else(|| AppError::BadRequest("Invalid delivery time slot".into()))?;

    let tz = business_tz(state.config.business_utc_offset_hours)?;
    let delivery_date = next_delivery_date(Utc::now().with_timezone(&tz));
    let delivery_datetime = delivery_date
        .and_time(NaiveTime::MIN)
        .and_local_timezone(tz)
        .single()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("ambiguous delivery datetime")))?;

    // The quoted line totals are authoritative; a client-declared grand
    // total that disagrees with them is a bug on the caller's side.
    let subtotal =
        promo_service::round_to_cents(payload.items.iter().map(|i| i.total_price).sum());
    if (subtotal - payload.total).abs() > 0.01 {
        return Err(AppError::BadRequest(
            "Order total does not match item prices".into(),
        ));
    }

    let txn = state.orm.begin().await?;

    // Promo application, gold-tier grant and usage increment all happen
    // under the same row lock so concurrent redemptions cannot overshoot
    // the usage cap.
    let promo_code = payload.promo_code.clone().filter(|c| !c.is_empty());
    let mut discount_amount = 0.0;
    if let Some(code) = promo_code.as_deref() {
        let promo = PromoCodes::find()
            .filter(
                Condition::all()
                    .add(PromoCol::Code.eq(code))
                    .add(PromoCol::IsActive.eq(true)),
            )
            .lock(LockType::Update)
            .one(&txn)
            .await?;

        if let Some(promo) = promo {
            if promo_service::is_exhausted(&promo) {
                return Err(AppError::BadRequest(
                    "Promo code usage limit exceeded".into(),
                ));
            }

            discount_amount = promo_service::compute_discount(&promo, subtotal);
            let grants_gold = promo.is_gold_code;
            let usage_count = promo.usage_count;

            let mut active: PromoActive = promo.into();
            active.usage_count = Set(usage_count + 1);
            active.update(&txn).await?;

            if grants_gold && !buyer.user.is_gold_client {
                let mut user: UserActive = buyer.user.clone().into();
                user.is_gold_client = Set(true);
                user.updated_at = Set(Some(Utc::now().into()));
                user.update(&txn).await?;
            }
        }
    }

    // Lock the current top of the sequence so concurrent creations
    // serialize; the unique index on order_number is the backstop.
    let current_max = Orders::find()
        .order_by_desc(OrderCol::OrderNumber)
        .limit(1)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .map(|o| o.order_number);
    let order_number = next_order_number(current_max);

    let order = OrderActive {
        id: NotSet,
        order_number: Set(order_number),
        user_id: Set(buyer.user.id),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        total_amount: Set(promo_service::round_to_cents(subtotal - discount_amount)),
        promo_code_used: Set(promo_code),
        discount_amount: Set(discount_amount),
        district_id: Set(district.id),
        delivery_time_slot: Set(time_slot.as_str().to_string()),
        delivery_date: Set(delivery_datetime),
        delivery_address: Set(None),
        comment: Set(payload.delivery.comment.clone()),
        contact_name: Set(payload.user_name.clone()),
        contact_phone: Set(buyer.user.phone.clone()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        // All-or-nothing: one dead product reference rolls back the whole
        // order, including items already staged above.
        let product = Products::find()
            .filter(
                Condition::all()
                    .add(ProductCol::Id.eq(item.product_id.clone()))
                    .add(ProductCol::IsActive.eq(true)),
            )
            .one(&txn)
            .await?;
        if product.is_none() {
            return Err(AppError::BadRequest(format!(
                "Product {} not found or inactive",
                item.product_id
            )));
        }

        let stored = OrderItemActive {
            id: NotSet,
            order_id: Set(order.id),
            product_id: Set(item.product_id.clone()),
            product_name: Set(item.product_name.clone()),
            package_code: Set(item.package_id.clone()),
            weight: Set(item.weight),
            unit: Set(item.unit.clone()),
            quantity: Set(item.quantity),
            price_per_unit: Set(item.price_per_unit),
            total_price: Set(item.total_price),
        }
        .insert(&txn)
        .await?;
        items.push(OrderItem::from(stored));
    }

    txn.commit().await?;

    let order = Order::from(order);
    tracing::info!(
        order_number = order.order_number,
        user_id = order.user_id,
        total = order.total_amount,
        "order created"
    );

    // Best-effort from here on: the customer already has their order.
    let notifier = state.notifier.clone();
    let notify_order = order.clone();
    let notify_items = items.clone();
    let district_name = district.name.clone();
    tokio::spawn(async move {
        notifier
            .notify_order_created(&notify_order, &notify_items, &district_name)
            .await;
    });

    Ok(ApiResponse::success(
        "Order created",
        OrderWithItems { order, items },
        Some(Meta::empty()),
    ))
}

pub async fn list_user_orders(state: &AppState, buyer: &Buyer) -> AppResult<ApiResponse<OrderList>> {
    let orders = Orders::find()
        .filter(OrderCol::UserId.eq(buyer.user.id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(orders.len());
    for order in orders {
        let items_count: (Option<i64>,) = sqlx::query_as(
            "SELECT SUM(quantity)::BIGINT FROM order_items WHERE order_id = $1",
        )
        .bind(order.id)
        .fetch_one(&state.pool)
        .await?;

        let order = Order::from(order);
        items.push(OrderSummary {
            id: order.id,
            order_number: order.order_number,
            user_id: order.user_id,
            status: order.status,
            total_amount: order.total_amount,
            delivery_date: order.delivery_date,
            contact_name: order.contact_name,
            created_at: order.created_at,
            items_count: items_count.0.unwrap_or(0),
        });
    }

    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    buyer: &Buyer,
    id: i32,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::Id.eq(id))
                .add(OrderCol::UserId.eq(buyer.user.id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
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

pub(crate) fn business_tz(offset_hours: i32) -> AppResult<FixedOffset> {
    FixedOffset::east_opt(offset_hours * 3600)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("invalid business UTC offset")))
}

/// Next valid delivery date: before the cutoff hour orders go out tomorrow,
/// at or after it the day after tomorrow.
fn next_delivery_date(now: DateTime<FixedOffset>) -> NaiveDate {
    let days = if now.hour() < DELIVERY_CUTOFF_HOUR { 1 } else { 2 };
    now.date_naive() + Days::new(days)
}

fn next_order_number(current_max: Option<i32>) -> i32 {
    match current_max {
        Some(max) => max + 1,
        None => FIRST_ORDER_NUMBER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn before_cutoff_delivers_tomorrow() {
        assert_eq!(
            next_delivery_date(at(17, 59)),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
        assert_eq!(
            next_delivery_date(at(8, 0)),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }

    #[test]
    fn at_cutoff_delivers_day_after_tomorrow() {
        assert_eq!(
            next_delivery_date(at(18, 0)),
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()
        );
        assert_eq!(
            next_delivery_date(at(23, 30)),
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()
        );
    }

    #[test]
    fn delivery_date_rolls_over_month_boundaries() {
        let now = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 2, 29, 19, 0, 0)
            .unwrap();
        assert_eq!(
            next_delivery_date(now),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }

    #[test]
    fn order_numbers_start_at_the_floor() {
        assert_eq!(next_order_number(None), 100);
    }

    #[test]
    fn order_numbers_continue_from_the_max() {
        assert_eq!(next_order_number(Some(457)), 458);
    }

    #[test]
    fn totals_balance_against_items_and_discount() {
        let item_totals = [500.0, 249.99, 120.01];
        let subtotal = promo_service::round_to_cents(item_totals.iter().sum());
        let discount = 87.0;
        let total = promo_service::round_to_cents(subtotal - discount);
        assert_eq!(total, 783.0);
        assert!((total - (item_totals.iter().sum::<f64>() - discount)).abs() < 0.005);
    }
}

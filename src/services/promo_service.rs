use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter};

use crate::{
    dto::products::{PromoValidateRequest, PromoValidateResponse},
    entity::promo_codes::{Column as PromoCol, Entity as PromoCodes, Model as PromoModel},
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub(crate) fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// True when a capped code has burned through its allowance.
pub fn is_exhausted(promo: &PromoModel) -> bool {
    promo
        .usage_limit
        .is_some_and(|limit| promo.usage_count >= limit)
}

/// Discount for a given subtotal: percentage wins over fixed amount, both
/// zero means no discount. Rounded to the cent.
pub fn compute_discount(promo: &PromoModel, subtotal: f64) -> f64 {
    let raw = if promo.discount_percent > 0.0 {
        subtotal * promo.discount_percent / 100.0
    } else if promo.discount_amount > 0.0 {
        promo.discount_amount
    } else {
        0.0
    };
    round_to_cents(raw)
}

/// Public applicability check. Does not consume usage; the order pipeline
/// increments the counter when the code is actually redeemed.
pub async fn validate_code(
    state: &AppState,
    payload: PromoValidateRequest,
) -> AppResult<ApiResponse<PromoValidateResponse>> {
    let promo = PromoCodes::find()
        .filter(
            Condition::all()
                .add(PromoCol::Code.eq(payload.code))
                .add(PromoCol::IsActive.eq(true)),
        )
        .one(&state.orm)
        .await?;

    let response = match promo {
        None => PromoValidateResponse {
            valid: false,
            discount_percent: None,
            discount_amount: None,
            is_gold_code: None,
            message: "Промокод не знайдено".into(),
        },
        Some(promo) if is_exhausted(&promo) => PromoValidateResponse {
            valid: false,
            discount_percent: None,
            discount_amount: None,
            is_gold_code: None,
            message: "Ліміт використання промокоду вичерпано".into(),
        },
        Some(promo) => PromoValidateResponse {
            valid: true,
            discount_percent: Some(promo.discount_percent),
            discount_amount: Some(promo.discount_amount),
            is_gold_code: Some(promo.is_gold_code),
            message: if promo.is_gold_code {
                "Gold клієнт!".into()
            } else {
                "Промокод дійсний".into()
            },
        },
    };

    Ok(ApiResponse::success("Ok", response, Some(Meta::empty())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promo(percent: f64, amount: f64, limit: Option<i32>, used: i32) -> PromoModel {
        PromoModel {
            id: 1,
            code: "SEA10".into(),
            discount_percent: percent,
            discount_amount: amount,
            is_active: true,
            usage_limit: limit,
            usage_count: used,
            is_gold_code: false,
        }
    }

    #[test]
    fn percentage_discount_applies_to_subtotal() {
        assert_eq!(compute_discount(&promo(10.0, 0.0, None, 0), 500.0), 50.0);
    }

    #[test]
    fn fixed_discount_ignores_subtotal() {
        assert_eq!(compute_discount(&promo(0.0, 50.0, None, 0), 120.0), 50.0);
        assert_eq!(compute_discount(&promo(0.0, 50.0, None, 0), 9999.0), 50.0);
    }

    #[test]
    fn percentage_wins_when_both_configured() {
        assert_eq!(compute_discount(&promo(10.0, 70.0, None, 0), 500.0), 50.0);
    }

    #[test]
    fn zero_configuration_means_zero_discount() {
        assert_eq!(compute_discount(&promo(0.0, 0.0, None, 0), 500.0), 0.0);
    }

    #[test]
    fn discount_rounds_to_the_cent() {
        // 3% of 33.33 = 0.9999
        assert_eq!(compute_discount(&promo(3.0, 0.0, None, 0), 33.33), 1.0);
    }

    #[test]
    fn usage_limit_exhaustion() {
        assert!(!is_exhausted(&promo(10.0, 0.0, None, 1_000_000)));
        assert!(!is_exhausted(&promo(10.0, 0.0, Some(5), 4)));
        assert!(is_exhausted(&promo(10.0, 0.0, Some(5), 5)));
        assert!(is_exhausted(&promo(10.0, 0.0, Some(5), 6)));
    }
}

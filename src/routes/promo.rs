use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::products::{PromoValidateRequest, PromoValidateResponse},
    error::AppResult,
    response::ApiResponse,
    services::promo_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/validate", post(validate_code))
}

#[utoipa::path(
    post,
    path = "/api/v1/promo/validate",
    request_body = PromoValidateRequest,
    responses(
        (status = 200, description = "Promo code applicability", body = ApiResponse<PromoValidateResponse>)
    ),
    tag = "Promo"
)]
pub async fn validate_code(
    State(state): State<AppState>,
    Json(payload): Json<PromoValidateRequest>,
) -> AppResult<Json<ApiResponse<PromoValidateResponse>>> {
    let resp = promo_service::validate_code(&state, payload).await?;
    Ok(Json(resp))
}

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    response::{ApiResponse, Meta},
    services::user_service,
    state::AppState,
    telegram::TelegramUser,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/interactions", post(record_interaction))
        .route("/stats", get(bot_stats))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BotUserPayload {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub is_bot: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BotInteractionRequest {
    pub user: BotUserPayload,
    /// "start", "message", "web_app" or "callback".
    pub interaction_type: String,
    #[serde(default)]
    pub message_text: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BotInteractionResponse {
    pub status: String,
    pub user_id: Option<i64>,
    pub interaction_count: Option<i32>,
    pub interaction_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BotStatsResponse {
    pub total_users: i64,
    pub bot_users: i64,
    pub total_bot_interactions: i64,
    pub active_users_last_7_days: i64,
    pub average_interactions_per_user: f64,
}

#[utoipa::path(
    post,
    path = "/api/v1/bot/interactions",
    request_body = BotInteractionRequest,
    responses(
        (status = 200, description = "Interaction recorded", body = ApiResponse<BotInteractionResponse>)
    ),
    tag = "Bot"
)]
pub async fn record_interaction(
    State(state): State<AppState>,
    Json(payload): Json<BotInteractionRequest>,
) -> AppResult<Json<ApiResponse<BotInteractionResponse>>> {
    if payload.user.is_bot.unwrap_or(false) {
        let data = BotInteractionResponse {
            status: "skipped".into(),
            user_id: None,
            interaction_count: None,
            interaction_type: payload.interaction_type,
        };
        return Ok(Json(ApiResponse::success("Skipped bot user", data, Some(Meta::empty()))));
    }

    if let Some(text) = payload.message_text.as_deref() {
        tracing::debug!(user_id = payload.user.id, text, "bot message recorded");
    }

    let tg = TelegramUser {
        id: payload.user.id,
        first_name: payload.user.first_name,
        last_name: payload.user.last_name,
        username: payload.user.username,
        language_code: payload.user.language_code,
        is_bot: payload.user.is_bot,
    };
    let user = user_service::record_interaction(&state, &tg).await?;

    let data = BotInteractionResponse {
        status: "recorded".into(),
        user_id: Some(user.id),
        interaction_count: Some(user.bot_interactions_count),
        interaction_type: payload.interaction_type,
    };
    Ok(Json(ApiResponse::success(
        "Interaction recorded",
        data,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/bot/stats",
    responses(
        (status = 200, description = "Bot usage statistics", body = ApiResponse<BotStatsResponse>)
    ),
    tag = "Bot"
)]
pub async fn bot_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<BotStatsResponse>>> {
    let stats = user_service::bot_stats(&state).await?;

    let average = if stats.bot_users > 0 {
        stats.total_bot_interactions as f64 / stats.bot_users as f64
    } else {
        0.0
    };

    let data = BotStatsResponse {
        total_users: stats.total_users,
        bot_users: stats.bot_users,
        total_bot_interactions: stats.total_bot_interactions,
        active_users_last_7_days: stats.active_users_last_7_days,
        average_interactions_per_user: average,
    };
    Ok(Json(ApiResponse::success("Ok", data, Some(Meta::empty()))))
}

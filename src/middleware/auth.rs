use axum::{extract::FromRequestParts, http::header};
use chrono::Utc;

use crate::{
    entity,
    error::{AppError, AuthError},
    services::{auth_service, user_service},
    state::AppState,
    telegram::validate_init_data,
};

/// Authenticated Mini-App customer. Extraction verifies the signed init
/// data, then loads (or creates) the matching user row and rejects blocked
/// accounts.
#[derive(Debug, Clone)]
pub struct Buyer {
    pub user: entity::users::Model,
}

impl FromRequestParts<AppState> for Buyer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_str = bearer_like_header(parts)?;

        let (scheme, raw) = auth_str.split_once(' ').ok_or(AuthError::BadHeader)?;
        if !scheme.eq_ignore_ascii_case("tma") {
            return Err(AuthError::BadHeader.into());
        }

        let init = validate_init_data(raw.trim(), &state.config.bot_token, Utc::now().timestamp())?;
        let user = user_service::sync_from_telegram(&state.orm, &init.user).await?;
        if user.is_blocked {
            return Err(AppError::Forbidden);
        }

        Ok(Buyer { user })
    }
}

/// Authenticated admin, from a JWT access token.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub admin_id: i32,
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_str = bearer_like_header(parts)?;

        let (scheme, token) = auth_str.split_once(' ').ok_or(AuthError::BadHeader)?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(AuthError::BadHeader.into());
        }

        let admin_id = auth_service::verify_token(token.trim(), "access", &state.config.jwt_secret)
            .ok_or_else(|| AppError::BadRequest("Invalid or expired token".into()))?;

        Ok(AdminAuth { admin_id })
    }
}

fn bearer_like_header(parts: &axum::http::request::Parts) -> Result<&str, AppError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::BadHeader)?;
    value.to_str().map_err(|_| AuthError::BadHeader.into())
}

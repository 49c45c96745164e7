use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};

use crate::{
    dto::auth::{AdminLogin, Claims, LoginResponse, TokenRefresh, TokenResponse},
    entity::admin_users::{
        ActiveModel as AdminActive, Column as AdminCol, Entity as AdminUsers, Model as AdminModel,
    },
    error::{AppError, AppResult},
    models::AdminUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

const ACCESS_TOKEN_TTL_SECS: i64 = 30 * 60;
const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

fn create_token(admin_id: i32, typ: &str, ttl_secs: i64, secret: &str) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::seconds(ttl_secs))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("failed to compute token expiry")))?;

    let claims = Claims {
        sub: admin_id.to_string(),
        typ: typ.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Decode a token and return the admin id when the signature, expiry and
/// token type all check out.
pub fn verify_token(token: &str, expected_typ: &str, secret: &str) -> Option<i32> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;

    if decoded.claims.typ != expected_typ {
        return None;
    }
    decoded.claims.sub.parse::<i32>().ok()
}

fn token_pair(admin_id: i32, secret: &str) -> AppResult<(String, String)> {
    let access = create_token(admin_id, "access", ACCESS_TOKEN_TTL_SECS, secret)?;
    let refresh = create_token(admin_id, "refresh", REFRESH_TOKEN_TTL_SECS, secret)?;
    Ok((access, refresh))
}

async fn find_active_admin(state: &AppState, admin_id: i32) -> AppResult<Option<AdminModel>> {
    Ok(AdminUsers::find()
        .filter(
            Condition::all()
                .add(AdminCol::Id.eq(admin_id))
                .add(AdminCol::IsActive.eq(true)),
        )
        .one(&state.orm)
        .await?)
}

pub async fn login(state: &AppState, payload: AdminLogin) -> AppResult<ApiResponse<LoginResponse>> {
    let admin = AdminUsers::find()
        .filter(
            Condition::all()
                .add(AdminCol::Username.eq(payload.username))
                .add(AdminCol::IsActive.eq(true)),
        )
        .one(&state.orm)
        .await?;

    let admin = match admin {
        Some(a) => a,
        None => return Err(AppError::BadRequest("Incorrect username or password".into())),
    };

    let parsed_hash = PasswordHash::new(&admin.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Incorrect username or password".into()));
    }

    let admin_id = admin.id;
    let mut active: AdminActive = admin.into();
    active.last_login = Set(Some(Utc::now().into()));
    let admin = active.update(&state.orm).await?;

    let (access_token, refresh_token) = token_pair(admin_id, &state.config.jwt_secret)?;

    tracing::info!(admin_id, "admin logged in");

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            access_token,
            refresh_token,
            token_type: "bearer".into(),
            expires_in: ACCESS_TOKEN_TTL_SECS,
            admin: AdminUser::from(admin),
        },
        Some(Meta::empty()),
    ))
}

pub async fn refresh(
    state: &AppState,
    payload: TokenRefresh,
) -> AppResult<ApiResponse<TokenResponse>> {
    let admin_id = verify_token(&payload.refresh_token, "refresh", &state.config.jwt_secret)
        .ok_or_else(|| AppError::BadRequest("Invalid or expired refresh token".into()))?;

    // The admin may have been deactivated since the refresh token was issued.
    if find_active_admin(state, admin_id).await?.is_none() {
        return Err(AppError::BadRequest("Admin user not found or inactive".into()));
    }

    let (access_token, refresh_token) = token_pair(admin_id, &state.config.jwt_secret)?;

    Ok(ApiResponse::success(
        "Token refreshed",
        TokenResponse {
            access_token,
            refresh_token,
            token_type: "bearer".into(),
            expires_in: ACCESS_TOKEN_TTL_SECS,
        },
        Some(Meta::empty()),
    ))
}

pub async fn me(state: &AppState, admin_id: i32) -> AppResult<ApiResponse<AdminUser>> {
    let admin = find_active_admin(state, admin_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Ok",
        AdminUser::from(admin),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_with_matching_type() {
        let secret = "test-secret";
        let token = create_token(7, "access", 60, secret).unwrap();
        assert_eq!(verify_token(&token, "access", secret), Some(7));
    }

    #[test]
    fn refresh_token_is_not_accepted_as_access() {
        let secret = "test-secret";
        let token = create_token(7, "refresh", 60, secret).unwrap();
        assert_eq!(verify_token(&token, "access", secret), None);
        assert_eq!(verify_token(&token, "refresh", secret), Some(7));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token(7, "access", 60, "secret-a").unwrap();
        assert_eq!(verify_token(&token, "access", "secret-b"), None);
    }

    #[test]
    fn expired_token_is_rejected() {
        let secret = "test-secret";
        let token = create_token(7, "access", -120, secret).unwrap();
        assert_eq!(verify_token(&token, "access", secret), None);
    }
}

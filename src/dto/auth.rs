use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::AdminUser;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminLogin {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRefresh {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub admin: AdminUser,
}

/// JWT claims for admin tokens. `typ` keeps access and refresh tokens from
/// being used interchangeably.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub typ: String,
    pub exp: usize,
}

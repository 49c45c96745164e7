use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::collections::BTreeMap;

use crate::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// How long signed init data stays acceptable, in seconds.
const MAX_AGE_SECS: i64 = 3600;

/// The `user` field of validated init data.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
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

/// Decoded, signature-checked init data.
#[derive(Debug, Clone)]
pub struct InitData {
    pub user: TelegramUser,
    pub auth_date: i64,
    pub query_id: Option<String>,
    pub start_param: Option<String>,
}

/// Validate Telegram Web App init data.
///
/// Telegram signs the payload with HMAC-SHA256. The signing secret is
/// HMAC-SHA256 over the bot token keyed by the literal string "WebAppData";
/// the data-check string is every field except `hash`, formatted as
/// `key=value`, sorted by key and joined with newlines.
///
/// `now_unix` is passed in rather than read from the system clock so the
/// freshness boundary stays testable.
pub fn validate_init_data(
    init_data: &str,
    bot_token: &str,
    now_unix: i64,
) -> Result<InitData, AuthError> {
    let mut params: BTreeMap<String, String> = init_data
        .split('&')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) => {
                    let decoded = urlencoding::decode(value).ok()?;
                    Some((key.to_string(), decoded.into_owned()))
                }
                _ => None,
            }
        })
        .collect();

    let received_hash = params.remove("hash").ok_or(AuthError::MissingHash)?;

    // BTreeMap iteration is already sorted by key.
    let data_check_string = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut secret_mac =
        HmacSha256::new_from_slice(b"WebAppData").map_err(|_| AuthError::InvalidSignature)?;
    secret_mac.update(bot_token.as_bytes());
    let secret_key = secret_mac.finalize().into_bytes();

    let mut mac =
        HmacSha256::new_from_slice(&secret_key).map_err(|_| AuthError::InvalidSignature)?;
    mac.update(data_check_string.as_bytes());
    let calculated_hash = hex::encode(mac.finalize().into_bytes());

    if calculated_hash != received_hash {
        return Err(AuthError::InvalidSignature);
    }

    let auth_date = params
        .get("auth_date")
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0);
    if auth_date == 0 {
        return Err(AuthError::MissingAuthDate);
    }
    if now_unix - auth_date > MAX_AGE_SECS {
        return Err(AuthError::Expired);
    }

    let user_json = params.get("user").ok_or(AuthError::MalformedUser)?;
    let user: TelegramUser =
        serde_json::from_str(user_json).map_err(|_| AuthError::MalformedUser)?;

    Ok(InitData {
        user,
        auth_date,
        query_id: params.get("query_id").cloned(),
        start_param: params.get("start_param").cloned(),
    })
}

#[cfg(test)]
pub(crate) fn sign_init_data(fields: &[(&str, &str)], bot_token: &str) -> String {
    // Build a payload the way a Telegram client would: sign the decoded
    // fields, then URL-encode the values for transport.
    let mut sorted: Vec<(&str, &str)> = fields.to_vec();
    sorted.sort_by_key(|(key, _)| *key);
    let data_check_string = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut secret_mac = HmacSha256::new_from_slice(b"WebAppData").unwrap();
    secret_mac.update(bot_token.as_bytes());
    let secret_key = secret_mac.finalize().into_bytes();

    let mut mac = HmacSha256::new_from_slice(&secret_key).unwrap();
    mac.update(data_check_string.as_bytes());
    let hash = hex::encode(mac.finalize().into_bytes());

    let mut encoded = fields
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>();
    encoded.push(format!("hash={hash}"));
    encoded.join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT_TOKEN: &str = "7000000001:AAtestbottokenfortests";
    const USER_JSON: &str =
        r#"{"id":123456789,"first_name":"Test","last_name":"User","language_code":"uk"}"#;

    #[test]
    fn valid_payload_is_accepted() {
        let auth_date = 1_700_000_000.to_string();
        let payload = sign_init_data(
            &[
                ("auth_date", auth_date.as_str()),
                ("query_id", "AAH3kMEA"),
                ("user", USER_JSON),
            ],
            BOT_TOKEN,
        );

        let data = validate_init_data(&payload, BOT_TOKEN, 1_700_000_100).unwrap();
        assert_eq!(data.user.id, 123456789);
        assert_eq!(data.user.first_name, "Test");
        assert_eq!(data.auth_date, 1_700_000_000);
        assert_eq!(data.query_id.as_deref(), Some("AAH3kMEA"));
        assert_eq!(data.start_param, None);
    }

    #[test]
    fn missing_hash_is_rejected() {
        let result = validate_init_data(
            "auth_date=1700000000&user=%7B%22id%22%3A1%7D",
            BOT_TOKEN,
            1_700_000_001,
        );
        assert_eq!(result.unwrap_err(), AuthError::MissingHash);
    }

    #[test]
    fn tampered_field_invalidates_signature() {
        let auth_date = 1_700_000_000.to_string();
        let payload = sign_init_data(&[("auth_date", auth_date.as_str()), ("user", USER_JSON)], BOT_TOKEN);

        // Flip one character inside the signed user payload.
        let tampered = payload.replace("123456789", "123456780");
        assert_ne!(tampered, payload);
        let result = validate_init_data(&tampered, BOT_TOKEN, 1_700_000_100);
        assert_eq!(result.unwrap_err(), AuthError::InvalidSignature);
    }

    #[test]
    fn wrong_bot_token_invalidates_signature() {
        let auth_date = 1_700_000_000.to_string();
        let payload = sign_init_data(&[("auth_date", auth_date.as_str()), ("user", USER_JSON)], BOT_TOKEN);
        let result = validate_init_data(&payload, "other-token", 1_700_000_100);
        assert_eq!(result.unwrap_err(), AuthError::InvalidSignature);
    }

    #[test]
    fn freshness_boundary_is_inclusive() {
        let auth_date = 1_700_000_000.to_string();
        let payload = sign_init_data(&[("auth_date", auth_date.as_str()), ("user", USER_JSON)], BOT_TOKEN);

        // Exactly 3600 seconds old still passes.
        assert!(validate_init_data(&payload, BOT_TOKEN, 1_700_000_000 + 3600).is_ok());

        let result = validate_init_data(&payload, BOT_TOKEN, 1_700_000_000 + 3601);
        assert_eq!(result.unwrap_err(), AuthError::Expired);
    }

    #[test]
    fn zero_auth_date_is_rejected() {
        let payload = sign_init_data(&[("auth_date", "0"), ("user", USER_JSON)], BOT_TOKEN);
        let result = validate_init_data(&payload, BOT_TOKEN, 1_700_000_000);
        assert_eq!(result.unwrap_err(), AuthError::MissingAuthDate);
    }

    #[test]
    fn malformed_user_json_is_rejected() {
        let auth_date = 1_700_000_000.to_string();
        let payload = sign_init_data(
            &[("auth_date", auth_date.as_str()), ("user", "not-json")],
            BOT_TOKEN,
        );
        let result = validate_init_data(&payload, BOT_TOKEN, 1_700_000_100);
        assert_eq!(result.unwrap_err(), AuthError::MalformedUser);
    }

    #[test]
    fn missing_user_field_is_rejected() {
        let auth_date = 1_700_000_000.to_string();
        let payload = sign_init_data(&[("auth_date", auth_date.as_str())], BOT_TOKEN);
        let result = validate_init_data(&payload, BOT_TOKEN, 1_700_000_100);
        assert_eq!(result.unwrap_err(), AuthError::MalformedUser);
    }
}

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub bot_token: String,
    pub jwt_secret: String,
    pub admin_chat_id: Option<String>,
    pub cors_origins: Vec<String>,
    /// Fixed UTC offset of the business's operating region. The delivery
    /// cutoff is evaluated against this clock, not the server's local time.
    pub business_utc_offset_hours: i32,
    pub notifications_enabled: bool,
    pub telegram_api_base: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let bot_token = env::var("TELEGRAM_BOT_TOKEN")?;
        let jwt_secret = env::var("JWT_SECRET")?;
        let admin_chat_id = env::var("ADMIN_CHAT_ID").ok().filter(|v| !v.is_empty());
        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| vec!["*".to_string()]);
        let business_utc_offset_hours = env::var("BUSINESS_UTC_OFFSET_HOURS")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(2);
        let notifications_enabled = env::var("NOTIFICATIONS_ENABLED")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(true);
        let telegram_api_base = env::var("TELEGRAM_API_BASE")
            .unwrap_or_else(|_| "https://api.telegram.org".to_string());

        Ok(Self {
            database_url,
            host,
            port,
            bot_token,
            jwt_secret,
            admin_chat_id,
            cors_origins,
            business_utc_offset_hours,
            notifications_enabled,
            telegram_api_base,
        })
    }
}

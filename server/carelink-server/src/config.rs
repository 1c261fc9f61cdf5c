//! Environment-driven application configuration.

use carelink_auth::TokenConfig;
use email_notify::EmailConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub token: TokenConfig,
    pub email: EmailConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let secret = std::env::var("CARELINK_JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("CARELINK_JWT_SECRET not set, falling back to the development secret");
            "carelink-dev-secret".to_string()
        });

        Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            token: TokenConfig::new(secret),
            email: EmailConfig::from_env(),
        }
    }
}

use std::env;
use std::path::PathBuf;

use crate::core::{AppError, Result};

pub mod server;

pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub paybylink: PayByLinkCredentials,
    pub example: ExampleCredentials,
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,

    /// Externally reachable base URL; providers call back into
    /// `{public_base_url}/payment/return/{endpoint}`
    pub public_base_url: String,
}

/// Administrator-provided PayByLink gateway credentials
#[derive(Debug, Clone)]
pub struct PayByLinkCredentials {
    pub shop_id: i64,
    pub secret_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct ExampleCredentials {
    pub checkout_url: String,
}

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Where the generated webhook secret is persisted
    pub secret_path: PathBuf,

    /// Upper bound on one outbound provider call
    pub provider_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                public_base_url: env::var("PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            },
            server: ServerConfig::from_env()?,
            paybylink: PayByLinkCredentials {
                shop_id: env::var("PAYBYLINK_SHOP_ID")
                    .map_err(|_| AppError::Configuration("PAYBYLINK_SHOP_ID not set".to_string()))?
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid PAYBYLINK_SHOP_ID".to_string())
                    })?,
                secret_key: env::var("PAYBYLINK_SECRET_KEY").map_err(|_| {
                    AppError::Configuration("PAYBYLINK_SECRET_KEY not set".to_string())
                })?,
                base_url: env::var("PAYBYLINK_BASE_URL")
                    .unwrap_or_else(|_| "https://secure.paybylink.pl".to_string()),
            },
            example: ExampleCredentials {
                checkout_url: env::var("EXAMPLE_CHECKOUT_URL")
                    .unwrap_or_else(|_| "https://checkout.example.com/pay".to_string()),
            },
            webhook: WebhookConfig {
                secret_path: env::var("WEBHOOK_SECRET_PATH")
                    .unwrap_or_else(|_| "data/webhook_secret".to_string())
                    .into(),
                provider_timeout_secs: env::var("PROVIDER_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid PROVIDER_TIMEOUT_SECS".to_string())
                    })?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.paybylink.shop_id <= 0 {
            return Err(AppError::Configuration(
                "PayByLink shop id must be positive".to_string(),
            ));
        }

        if self.paybylink.secret_key.is_empty() {
            return Err(AppError::Configuration(
                "PayByLink secret key must not be empty".to_string(),
            ));
        }

        if self.webhook.provider_timeout_secs == 0 {
            return Err(AppError::Configuration(
                "Provider timeout must be greater than 0".to_string(),
            ));
        }

        if self.app.public_base_url.is_empty() {
            return Err(AppError::Configuration(
                "Public base URL must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

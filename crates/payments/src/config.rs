//! Payments function configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COMMERCE_API_KEY` - Crypto gateway API key. Injected by the deployment
//!   environment's secret store; never embedded in source, never logged.
//!
//! ## Optional
//! - `PAYMENTS_HOST` - Bind address (default: 127.0.0.1)
//! - `PAYMENTS_PORT` - Listen port (default: 3002)
//! - `COMMERCE_API_URL` - Gateway base URL (default: Coinbase Commerce)
//! - `SETTLEMENT_CURRENCY` - Fixed-price settlement currency (default: USD)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use silkroots_core::CurrencyCode;

/// Default gateway base URL.
const DEFAULT_COMMERCE_API_URL: &str = "https://api.commerce.coinbase.com";

/// Blocklist of common placeholder patterns (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-", "changeme", "replace", "placeholder", "example", "xxx", "todo", "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Payments function configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct PaymentsConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Crypto gateway base URL
    pub commerce_api_url: String,
    /// Crypto gateway API key (server-held secret)
    pub commerce_api_key: SecretString,
    /// Settlement currency for fixed-price charges
    pub settlement_currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for PaymentsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentsConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("commerce_api_url", &self.commerce_api_url)
            .field("commerce_api_key", &"[REDACTED]")
            .field("settlement_currency", &self.settlement_currency)
            .field("sentry_dsn", &self.sentry_dsn)
            .finish()
    }
}

impl PaymentsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("PAYMENTS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PAYMENTS_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PAYMENTS_PORT", "3002")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PAYMENTS_PORT".to_string(), e.to_string()))?;
        let commerce_api_url =
            get_env_or_default("COMMERCE_API_URL", DEFAULT_COMMERCE_API_URL);
        let commerce_api_key = get_validated_secret("COMMERCE_API_KEY")?;
        let settlement_currency = get_env_or_default("SETTLEMENT_CURRENCY", "USD")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("SETTLEMENT_CURRENCY".to_string(), e))?;

        Ok(Self {
            host,
            port,
            commerce_api_url,
            commerce_api_key,
            settlement_currency,
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a secret is not an obvious placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value =
        std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

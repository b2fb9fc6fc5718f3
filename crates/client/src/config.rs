//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Data Access API
//! - `GASPASS_API_URL` - Base URL including `/api` (default: `http://localhost:3000/api`)
//! - `GASPASS_CART_PATH` - Cart file (default: `<data dir>/gaspass/cart.json`)
//!
//! ## Checkout
//! - `CHECKOUT_CHANNEL_TIMEOUT_SECS` - Per-channel delivery timeout (default: 10)
//! - `CHECKOUT_CURRENCY` - Currency label in order summaries (default: FCFA)
//!
//! ## Telegram channel (enabled when token and chat ID are both set)
//! - `TELEGRAM_BOT_TOKEN` - Bot token
//! - `TELEGRAM_CHAT_ID` - Destination chat
//! - `TELEGRAM_API_URL` - Bot API base (default: `https://api.telegram.org`)
//!
//! ## `EmailJS` channel (enabled when service, template and key are all set)
//! - `EMAILJS_SERVICE_ID` - Service ID
//! - `EMAILJS_TEMPLATE_ID` - Template ID
//! - `EMAILJS_PUBLIC_KEY` - Public key (sent as `user_id`)
//! - `EMAILJS_API_URL` - REST API base (default: `https://api.emailjs.com`)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Default Data Access API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Default `EmailJS` REST API base URL.
pub const DEFAULT_EMAILJS_API_URL: &str = "https://api.emailjs.com";

/// Default currency label for order summaries.
pub const DEFAULT_CURRENCY: &str = "FCFA";

/// Default per-channel delivery timeout.
pub const DEFAULT_CHANNEL_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Data Access API base URL, without a trailing slash
    pub api_url: String,
    /// Where the cart is persisted
    pub cart_path: PathBuf,
    /// Telegram channel settings, if enabled
    pub telegram: Option<TelegramConfig>,
    /// `EmailJS` channel settings, if enabled
    pub emailjs: Option<EmailJsConfig>,
    /// Upper bound on each channel's delivery
    pub channel_timeout: Duration,
    /// Currency label used in order summaries
    pub currency: String,
}

/// Telegram Bot API settings.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: SecretString,
    pub chat_id: String,
    pub api_url: String,
}

/// `EmailJS` settings.
#[derive(Debug, Clone)]
pub struct EmailJsConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: SecretString,
    pub api_url: String,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is invalid, or if no cart path is set
    /// and the platform has no data directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = trim_base(&get("GASPASS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()));

        let cart_path = match get("GASPASS_CART_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_cart_path()
                .ok_or_else(|| ConfigError::MissingEnvVar("GASPASS_CART_PATH".to_string()))?,
        };

        let channel_timeout = match get("CHECKOUT_CHANNEL_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    ConfigError::InvalidEnvVar(
                        "CHECKOUT_CHANNEL_TIMEOUT_SECS".to_string(),
                        format!("expected a positive number of seconds, got {raw:?}"),
                    )
                })?,
            None => DEFAULT_CHANNEL_TIMEOUT,
        };

        let telegram = match (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            (Some(token), Some(chat_id)) => Some(TelegramConfig {
                bot_token: SecretString::from(token),
                chat_id,
                api_url: trim_base(
                    &get("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.into()),
                ),
            }),
            _ => None,
        };

        let emailjs = match (
            get("EMAILJS_SERVICE_ID"),
            get("EMAILJS_TEMPLATE_ID"),
            get("EMAILJS_PUBLIC_KEY"),
        ) {
            (Some(service_id), Some(template_id), Some(public_key)) => Some(EmailJsConfig {
                service_id,
                template_id,
                public_key: SecretString::from(public_key),
                api_url: trim_base(
                    &get("EMAILJS_API_URL").unwrap_or_else(|| DEFAULT_EMAILJS_API_URL.into()),
                ),
            }),
            _ => None,
        };

        Ok(Self {
            api_url,
            cart_path,
            telegram,
            emailjs,
            channel_timeout,
            currency: get("CHECKOUT_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.into()),
        })
    }
}

/// `<data dir>/gaspass/cart.json`, if the platform has a data directory.
#[must_use]
pub fn default_cart_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("gaspass").join("cart.json"))
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("GASPASS_CART_PATH", "/tmp/cart.json")]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.cart_path, PathBuf::from("/tmp/cart.json"));
        assert_eq!(config.channel_timeout, DEFAULT_CHANNEL_TIMEOUT);
        assert_eq!(config.currency, "FCFA");
        assert!(config.telegram.is_none());
        assert!(config.emailjs.is_none());
    }

    #[test]
    fn test_channels_need_every_credential() {
        let config = config(&[
            ("GASPASS_CART_PATH", "/tmp/cart.json"),
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("EMAILJS_SERVICE_ID", "service"),
            ("EMAILJS_TEMPLATE_ID", "template"),
        ])
        .unwrap();
        assert!(config.telegram.is_none());
        assert!(config.emailjs.is_none());
    }

    #[test]
    fn test_channels_enabled() {
        let config = config(&[
            ("GASPASS_CART_PATH", "/tmp/cart.json"),
            ("GASPASS_API_URL", "https://api.gaspass.shop/api/"),
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "42"),
            ("EMAILJS_SERVICE_ID", "service"),
            ("EMAILJS_TEMPLATE_ID", "template"),
            ("EMAILJS_PUBLIC_KEY", "public"),
            ("EMAILJS_API_URL", "http://127.0.0.1:9000/"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "https://api.gaspass.shop/api");
        let telegram = config.telegram.unwrap();
        assert_eq!(telegram.bot_token.expose_secret(), "123:abc");
        assert_eq!(telegram.api_url, DEFAULT_TELEGRAM_API_URL);
        let emailjs = config.emailjs.unwrap();
        assert_eq!(emailjs.api_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let config = config(&[
            ("GASPASS_CART_PATH", "/tmp/cart.json"),
            ("TELEGRAM_BOT_TOKEN", "123:very-secret"),
            ("TELEGRAM_CHAT_ID", "42"),
        ])
        .unwrap();
        assert!(!format!("{config:?}").contains("very-secret"));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = config(&[
            ("GASPASS_CART_PATH", "/tmp/cart.json"),
            ("CHECKOUT_CHANNEL_TIMEOUT_SECS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "CHECKOUT_CHANNEL_TIMEOUT_SECS"));
    }
}

//! CLI configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use cart_api::{FetchPolicy, RetryPolicy, TimeoutConfig};
use cart_core::{Currency, DEFAULT_STORAGE_KEY};
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Catalog API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Cart storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Display configuration.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Catalog API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL serving `/stock/{id}` and `/products/{id}`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after a failed request (server errors, timeouts, refused connections).
    #[serde(default)]
    pub max_retries: u32,
}

impl ApiConfig {
    /// Fetch policy for the catalog client.
    pub fn fetch_policy(&self) -> FetchPolicy {
        let retry = if self.max_retries == 0 {
            RetryPolicy::none()
        } else {
            RetryPolicy::new(self.max_retries)
        };
        FetchPolicy::new(
            TimeoutConfig::from_total(Duration::from_millis(self.timeout_ms)),
            retry,
        )
    }
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            max_retries: 0,
        }
    }
}

/// Where the cart is kept between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store directory, relative to the working directory unless absolute.
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Key the cart is stored under.
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_dir() -> String {
    ".cart".to_string()
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            key: default_key(),
        }
    }
}

/// Display settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Currency prices are shown in.
    #[serde(default)]
    pub currency: Currency,
}

/// Generate a default cart.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Storefront cart configuration

[api]
base_url = "{base_url}"
timeout_ms = {timeout_ms}
max_retries = 0

[storage]
dir = "{dir}"
key = "{key}"

[display]
currency = "BRL"
"#,
        base_url = default_base_url(),
        timeout_ms = default_timeout_ms(),
        dir = default_dir(),
        key = default_key(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: CliConfig = toml::from_str(
            r#"
[api]
base_url = "https://shop.example/api"

[display]
currency = "USD"
"#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://shop.example/api");
        assert_eq!(config.api.timeout_ms, 5000);
        assert_eq!(config.storage.key, "@RocketShoes:cart");
        assert_eq!(config.display.currency, Currency::USD);
    }

    #[test]
    fn test_load_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        std::fs::write(&path, r#"{"storage":{"dir":"/tmp/carts"}}"#).unwrap();

        let config = CliConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.storage.dir, "/tmp/carts");
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_fetch_policy_from_config() {
        let api = ApiConfig {
            max_retries: 2,
            timeout_ms: 800,
            ..ApiConfig::default()
        };
        let policy = api.fetch_policy();
        assert_eq!(policy.retry.max_retries, 2);
        assert_eq!(policy.timeout.total, Duration::from_millis(800));

        assert_eq!(ApiConfig::default().fetch_policy().retry, RetryPolicy::none());
    }
}

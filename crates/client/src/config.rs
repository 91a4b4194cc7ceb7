//! Client configuration, read from the environment.

use std::time::Duration;

use crate::storage::StorageKeys;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_AUTH_PATH: &str = "/api/auth/login";
pub const DEFAULT_PRODUCTS_PATH: &str = "/api/produtos";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin, without a trailing slash.
    pub api_base_url: String,
    pub auth_path: String,
    pub products_path: String,
    pub request_timeout: Duration,
    pub storage_keys: StorageKeys,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            auth_path: DEFAULT_AUTH_PATH.to_string(),
            products_path: DEFAULT_PRODUCTS_PATH.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            storage_keys: StorageKeys::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Read `PDV_API_URL`, `PDV_AUTH_PATH`, `PDV_TOKEN_KEY` and
    /// `PDV_REQUEST_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = match lookup("PDV_API_URL") {
            Some(url) => Self::new(url),
            None => Self::default(),
        };

        if let Some(path) = lookup("PDV_AUTH_PATH") {
            config.auth_path = path;
        }

        if let Some(key) = lookup("PDV_TOKEN_KEY") {
            config.storage_keys.token = key;
        }

        if let Some(raw) = lookup("PDV_REQUEST_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    value = %raw,
                    "PDV_REQUEST_TIMEOUT_SECS is not a positive whole number of seconds; using default"
                ),
            }
        }

        config
    }

    pub fn auth_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.auth_path)
    }

    pub fn products_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.products_path)
    }

    pub fn product_url(&self, id: i64) -> String {
        format!("{}/{}", self.products_url(), id)
    }
}

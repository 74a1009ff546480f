//! Configuration Module
//!
//! Loads the Dolibarr API credentials and client tuning from environment variables.

use std::env;

use crate::cache::DEFAULT_MAX_CACHED_REQUESTS;

/// Default API endpoint written by a fresh install.
pub const DEFAULT_URL: &str = "https://dolibarr.example.org/api/index.php/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 16;

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST API, always ending with `/`
    pub url: String,
    /// Value sent in the `DOLAPIKEY` header
    pub api_token: String,
    /// Sent as the `User-Agent` of every request
    pub application_name: String,
    /// Whether TLS certificates are verified
    pub verify_ssl: bool,
    /// Fixed request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum number of responses kept by the cache
    pub max_cached_requests: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DOLIBARR_URL` - API base URL (default: `DEFAULT_URL`)
    /// - `DOLIBARR_API_TOKEN` - API key (default: empty)
    /// - `DOLIBARR_APPLICATION_NAME` - User agent (default: DolibarrRS)
    /// - `DOLIBARR_VERIFY_SSL` - `false` disables certificate checks (default: true)
    /// - `DOLIBARR_TIMEOUT_SECS` - Request timeout (default: 16)
    /// - `DOLIBARR_MAX_CACHED_REQUESTS` - Cache bound (default: 100)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: normalize_url(&env::var("DOLIBARR_URL").unwrap_or(defaults.url)),
            api_token: env::var("DOLIBARR_API_TOKEN").unwrap_or(defaults.api_token),
            application_name: env::var("DOLIBARR_APPLICATION_NAME")
                .unwrap_or(defaults.application_name),
            verify_ssl: env::var("DOLIBARR_VERIFY_SSL")
                .map(|v| !v.trim().eq_ignore_ascii_case("false"))
                .unwrap_or(defaults.verify_ssl),
            timeout_secs: env::var("DOLIBARR_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            max_cached_requests: env::var("DOLIBARR_MAX_CACHED_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_cached_requests),
        }
    }

    /// Returns a copy pointing at another base URL.
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = normalize_url(url);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            api_token: String::new(),
            application_name: "DolibarrRS".to_string(),
            verify_ssl: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_cached_requests: DEFAULT_MAX_CACHED_REQUESTS,
        }
    }
}

/// Endpoint paths are appended directly to the base URL.
fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

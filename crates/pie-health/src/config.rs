//! Health API client configuration.

use std::time::Duration;

/// Base URL of the public APIpie API.
pub const DEFAULT_BASE_URL: &str = "https://api.apipie.ai";

/// Path of the model availability listing, relative to the base URL.
pub const DEFAULT_AVAILABILITY_PATH: &str = "health/models";

/// Environment variable that overrides the base URL.
pub const BASE_URL_ENV: &str = "APIPIE_BASE_URL";

/// Configuration for the health API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,
    /// Path of the model availability listing.
    pub availability_path: String,
    /// Headers sent with every request unless a request overrides them.
    pub default_headers: Vec<(String, String)>,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            availability_path: DEFAULT_AVAILABILITY_PATH.to_string(),
            default_headers: vec![("accept".to_string(), "application/json".to_string())],
            timeout: None,
            user_agent: concat!("pie-health/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    /// Create a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Default configuration with the base URL taken from `APIPIE_BASE_URL` when set.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    /// Set the availability listing path.
    #[must_use]
    pub fn with_availability_path(mut self, path: impl Into<String>) -> Self {
        self.availability_path = path.into();
        self
    }

    /// Add a default header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();

        assert_eq!(config.base_url, "https://api.apipie.ai");
        assert_eq!(config.availability_path, "health/models");
        assert_eq!(config.default_headers.len(), 1);
        assert!(config.timeout.is_none());
        assert!(config.user_agent.starts_with("pie-health/"));
    }

    #[test]
    fn test_config_new() {
        let config = ApiConfig::new("http://localhost:9000");

        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.availability_path, DEFAULT_AVAILABILITY_PATH);
    }

    #[test]
    fn test_config_builder() {
        let config = ApiConfig::new("http://localhost:9000")
            .with_availability_path("v2/availability")
            .with_header("x-api-key", "secret")
            .with_timeout(Duration::from_secs(10))
            .with_user_agent("dashboard-test");

        assert_eq!(config.availability_path, "v2/availability");
        assert!(
            config
                .default_headers
                .contains(&("x-api-key".to_string(), "secret".to_string()))
        );
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.user_agent, "dashboard-test");
    }
}

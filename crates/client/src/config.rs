//! Client configuration from environment variables.

use std::time::Duration;

/// Backend used when `STOREFRONT_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// API connection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Declared for operators; requests are never retried automatically.
    pub retry_attempts: u32,
}

/// Credential settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
    /// Storage key the access token is persisted under.
    pub token_key: String,
    pub token_expiry: chrono::Duration,
    /// How long before expiry a token counts as due for refresh.
    pub refresh_threshold: chrono::Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub environment: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub app: AppConfig,
    /// Extra diagnostics for failed requests.
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_environment(DEFAULT_API_URL.to_string(), "development".to_string())
    }
}

impl ClientConfig {
    /// Build the configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STOREFRONT_API_URL`: backend base URL (default: "http://localhost:3001/api")
    /// - `STOREFRONT_ENV`: "development" | "production" | ... (default: "development")
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("STOREFRONT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let environment =
            std::env::var("STOREFRONT_ENV").unwrap_or_else(|_| "development".to_string());
        Self::with_environment(base_url, environment)
    }

    fn with_environment(base_url: String, environment: String) -> Self {
        let debug = environment == "development";
        Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(10),
                retry_attempts: 3,
            },
            auth: AuthConfig {
                token_key: "token".to_string(),
                token_expiry: chrono::Duration::days(7),
                refresh_threshold: chrono::Duration::minutes(5),
            },
            app: AppConfig {
                name: "Tienda Online".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                environment,
            },
            debug,
        }
    }

    /// Point the client at a different backend.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// Full URL for an endpoint, joined with exactly one slash.
    pub fn api_url(&self, endpoint: &str) -> String {
        let base = self.api.base_url.trim_end_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        format!("{base}/{endpoint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert_eq!(config.api.retry_attempts, 3);
        assert_eq!(config.auth.token_key, "token");
        assert_eq!(config.auth.token_expiry, chrono::Duration::days(7));
        assert!(config.debug);
    }

    #[test]
    fn api_url_normalizes_slashes() {
        let config = ClientConfig::default().with_base_url("http://shop.test/api/");
        assert_eq!(config.api_url("/health"), "http://shop.test/api/health");
        assert_eq!(config.api_url("products"), "http://shop.test/api/products");
    }

    #[test]
    fn production_disables_debug() {
        let config = ClientConfig::with_environment("http://x".into(), "production".into());
        assert!(!config.debug);
        assert_eq!(config.app.environment, "production");
    }
}

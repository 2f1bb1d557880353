//! HTTP gateway to the storefront API.
//!
//! Every backend call goes through [`ApiClient`]: it attaches the stored bearer
//! token and reacts to `401 Unauthorized` by dropping the credential, notifying
//! registered hooks and sending the user to the login page.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use storefront_shared::ApiError;

use crate::config::{AuthConfig, ClientConfig};
use crate::credentials::{CredentialStore, PersistentCredentials, StoredToken};
use crate::navigation::Navigator;
use crate::routes;

/// Callback run whenever the backend answers 401.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// HTTP client for the storefront API. Cheap to clone; clones share the
/// credential store, navigator and hooks.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: AuthConfig,
    debug: bool,
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    unauthorized_hooks: Arc<RwLock<Vec<UnauthorizedHook>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            client: build_http_client(config),
            base_url: config.api.base_url.clone(),
            auth: config.auth.clone(),
            debug: config.debug,
            credentials,
            navigator,
            unauthorized_hooks: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Client using durable token storage and the platform's navigator.
    pub fn from_config(config: &ClientConfig) -> Self {
        let credentials = Arc::new(PersistentCredentials::new(config.auth.token_key.clone()));
        #[cfg(target_arch = "wasm32")]
        let navigator: Arc<dyn Navigator> = Arc::new(crate::navigation::BrowserNavigator);
        #[cfg(not(target_arch = "wasm32"))]
        let navigator: Arc<dyn Navigator> = Arc::new(crate::navigation::MemoryNavigator::default());
        Self::new(config, credentials, navigator)
    }

    /// Set the base URL for API requests
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn auth_config(&self) -> &AuthConfig {
        &self.auth
    }

    /// Persist a freshly issued access token for the configured lifetime.
    pub fn store_token(&self, token: &str) {
        self.credentials.save(&StoredToken::issue(token, self.auth.token_expiry));
    }

    /// Register a callback for 401 responses.
    pub fn on_unauthorized(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.unauthorized_hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(hook));
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    fn hooks(&self) -> Vec<UnauthorizedHook> {
        self.unauthorized_hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn handle_unauthorized(&self) {
        self.credentials.clear();

        for hook in self.hooks() {
            hook();
        }

        let current = self.navigator.current_path();
        crate::log_debug!("401 received on {}", current);
        if !routes::is_auth_page(&current) {
            self.navigator.navigate(routes::LOGIN_PATH);
        }
    }

    fn report(&self, method: &Method, url: &str, err: &ApiError) {
        if self.debug {
            crate::log_warn!(
                "API error: method={} url={} status={:?} message={}",
                method,
                url,
                err.status(),
                err
            );
        }
    }

    /// Issue a request and return the body of a successful response.
    async fn send_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<String, ApiError> {
        let url = self.url(path);
        if self.debug {
            crate::log_debug!("API request: method={} url={}", method, url);
        }
        let mut rb = self.client.request(method.clone(), &url);

        if let Some(token) = self.credentials.token() {
            rb = rb.bearer_auth(token);
        }
        if let Some(body) = body {
            rb = rb.header(CONTENT_TYPE, "application/json").body(body);
        }

        let resp = match rb.send().await {
            Ok(resp) => resp,
            Err(e) => {
                let err = ApiError::Network(e.to_string());
                self.report(&method, &url, &err);
                return Err(err);
            }
        };

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                self.handle_unauthorized();
            }
            let err = ApiError::Http {
                status: status.as_u16(),
                body: text,
            };
            self.report(&method, &url, &err);
            return Err(err);
        }

        Ok(text)
    }

    async fn send<TRes: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<TRes, ApiError> {
        let text = self.send_raw(method, path, body).await?;
        if text.trim().is_empty() {
            serde_json::from_str("null").map_err(|e| ApiError::Deserialize(e.to_string()))
        } else {
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialize(e.to_string()))
        }
    }

    fn encode<TReq: Serialize>(body: &TReq) -> Result<Vec<u8>, ApiError> {
        serde_json::to_vec(body).map_err(|e| ApiError::Deserialize(e.to_string()))
    }

    pub async fn get_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post_json<TReq: Serialize, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        self.send(Method::POST, path, Some(Self::encode(body)?)).await
    }

    /// POST without a request body.
    pub async fn post_empty<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        self.send(Method::POST, path, None).await
    }

    pub async fn put_json<TReq: Serialize, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        self.send(Method::PUT, path, Some(Self::encode(body)?)).await
    }

    /// DELETE, decoding whatever the server answers (empty bodies decode as `null`).
    pub async fn delete_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        self.send(Method::DELETE, path, None).await
    }

    /// DELETE, ignoring the response body.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_raw(Method::DELETE, path, None).await.map(|_| ())
    }

    /// Liveness check. Only the status code matters.
    pub async fn check_health(&self) -> bool {
        match self.client.get(self.url("/health")).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                crate::log_warn!("Backend health check failed: {}", e);
                false
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http_client(config: &ClientConfig) -> Client {
    Client::builder()
        .timeout(config.api.timeout)
        .build()
        .unwrap_or_else(|e| {
            crate::log_warn!("falling back to default HTTP client: {}", e);
            Client::new()
        })
}

#[cfg(target_arch = "wasm32")]
fn build_http_client(_config: &ClientConfig) -> Client {
    Client::new()
}

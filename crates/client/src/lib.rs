//! Storefront client.
//!
//! Framework-agnostic client state for the online shop: an HTTP gateway to the
//! REST API, durable credential storage, route access control and the
//! session, cart, catalog and UI stores a web or desktop front end drives.

pub mod api;
pub mod api_client;
pub mod config;
pub mod credentials;
pub mod logging;
pub mod navigation;
pub mod routes;
pub mod storage;
pub mod stores;

use std::sync::Arc;

pub use api_client::ApiClient;
pub use config::ClientConfig;
pub use credentials::{CredentialStore, MemoryCredentials, PersistentCredentials, StoredToken};
pub use navigation::{MemoryNavigator, Navigator};
pub use routes::RouteDecision;
pub use stores::{CartStore, CatalogStore, SessionStore, UiStore};

/// All stores wired to one gateway.
#[derive(Clone)]
pub struct Storefront {
    pub api: ApiClient,
    pub session: SessionStore,
    pub cart: CartStore,
    pub catalog: CatalogStore,
    pub ui: UiStore,
}

impl Storefront {
    pub fn new(api: ApiClient) -> Self {
        Self {
            session: SessionStore::new(api.clone()),
            cart: CartStore::new(api.clone()),
            catalog: CatalogStore::new(api.clone()),
            ui: UiStore::new(),
            api,
        }
    }

    /// Storefront backed by durable storage and the platform navigator.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(ApiClient::from_config(config))
    }

    pub fn with_parts(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::new(ApiClient::new(config, credentials, navigator))
    }

    /// Check a navigation against the stored credential.
    pub fn guard(&self, path: &str) -> RouteDecision {
        routes::guard(path, self.api.credentials().has_token())
    }

    /// Navigate to `path`, or wherever the route guard sends the user instead.
    pub fn visit(&self, path: &str) -> RouteDecision {
        let decision = self.guard(path);
        match &decision {
            RouteDecision::Allow => self.api.navigator().navigate(path),
            RouteDecision::Redirect(target) => self.api.navigator().navigate(target),
        }
        decision
    }
}

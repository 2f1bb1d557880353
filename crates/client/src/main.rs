//! Backend connectivity check.
//!
//! Checks `<STOREFRONT_API_URL>/health` and exits non-zero when the backend
//! cannot be reached.

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_FILTER: &str = "storefront_client=debug,check_backend=info";

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use storefront_client::{ApiClient, ClientConfig};
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env();
    let filter = filter.unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ClientConfig::from_env();
    tracing::info!(
        "{} v{} ({}): checking backend at {}",
        config.app.name,
        config.app.version,
        config.app.environment,
        config.api.base_url
    );

    let api = ApiClient::from_config(&config);
    if api.check_health().await {
        let health = config.api_url("/health");
        tracing::info!("backend is running, health endpoint: {}", health);
        Ok(())
    } else {
        anyhow::bail!("backend is not accessible at {}", config.api.base_url)
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

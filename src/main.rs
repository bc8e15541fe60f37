//! campus-events server entry point.
//!
//! Loads configuration, selects the store once, and serves the REST API.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use campus_events::api;
use campus_events::app_state::AppState;
use campus_events::config::{LogFormat, PortalConfig};
use campus_events::service::PortalService;
use campus_events::store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = PortalConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Plain => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting campus-events");

    // Select the store and build the service layer
    let store = store::open(&config)
        .await
        .context("failed to open the live store")?;
    let portal_service = PortalService::new(store);
    tracing::info!(mode = %portal_service.mode(), "store ready");

    // Build router
    let app = api::build_app(AppState::new(portal_service));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

pub mod api; // Local dashboard API
pub mod config;
pub mod core_state;
pub mod expert; // Expert consultation form
pub mod history; // Per-session scan history
pub mod i18n; // English / Hindi UI strings
pub mod models;
pub mod pipeline; // Acquire → classify → advise → metrics
pub mod session_cache;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::ServerError;
use crate::config::ServerConfig;
use crate::core_state::CoreState;

/// Initialize logging, load the classifier once, and serve the API until
/// Ctrl-C.
pub async fn run() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("CropPulse starting v{}", config::APP_VERSION);

    let server_config = ServerConfig::from_env();
    let core = Arc::new(CoreState::from_config(&server_config));

    let server = api::start_api_server(core, server_config.bind_addr).await?;
    tracing::info!(addr = %server.info.server_addr, "Dashboard API listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
    }

    server.stop().await;
    tracing::info!("CropPulse stopped");
    Ok(())
}

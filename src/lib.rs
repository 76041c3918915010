pub mod api;
pub mod config;
pub mod core_state;
pub mod formulary;
pub mod ingredients;
pub mod interactions;
pub mod medications;
pub mod models;
pub mod session;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::ServerError;
use crate::config::AppConfig;
use crate::core_state::CoreState;
use crate::formulary::{FormularyResolver, HttpFormularyClient};

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the
/// default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Build the shared state for `config`.
///
/// The formulary client is blocking; build it outside any async runtime.
pub fn build_core(config: &AppConfig) -> Result<Arc<CoreState>, ServerError> {
    let client = HttpFormularyClient::from_config(&config.formulary)?;
    tracing::info!(api_url = client.api_url(), "Formulary client ready");
    let resolver = FormularyResolver::new(Box::new(client), config.formulary.clone());
    let core = CoreState::new(resolver);
    tracing::info!(aliases = core.ingredients().len(), "Ingredient map loaded");
    Ok(Arc::new(core))
}

/// Start the service and block until Ctrl-C.
pub fn run() -> Result<(), ServerError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::load()?;
    let core = build_core(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(serve(Arc::clone(&core), config));

    // The blocking HTTP client must not be dropped inside the runtime.
    drop(runtime);
    drop(core);
    result
}

async fn serve(core: Arc<CoreState>, config: AppConfig) -> Result<(), ServerError> {
    let mut server = api::start_api_server(core, config.bind_addr).await?;
    tracing::info!(addr = %server.addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }

    server.shutdown();
    server.wait().await;
    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}

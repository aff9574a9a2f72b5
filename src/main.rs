use anyhow::Context;
use config::AppConfig;
use error::AppResult;
use platform::PlatformRegistry;
use state::AppState;

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

mod config;
mod error;
mod handlers;
mod platform;
mod runtime;
mod service;
mod state;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> AppResult<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    let _ = pretty_env_logger::try_init_timed();

    info!("Starting UniDownload API...");

    let config = AppConfig::from_env()?;
    let registry = PlatformRegistry::from_config(&config.extractor);

    info!("Initializing AppState...");
    let state = AppState::new(config, registry)?;
    state.runtime.start().await?;

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on {}", addr);

    let runtime = state.runtime.clone();
    let app = handlers::build_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    runtime.stop().await?;
    info!("UniDownload API stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

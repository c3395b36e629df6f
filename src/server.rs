//! HTTP server initialization and runtime setup.
//!
//! Handles store connections, service wiring, and the Axum server lifecycle.

use crate::application::services::{RateLimiter, ShortenerService, StatsCounter};
use crate::config::Config;
use crate::infrastructure::Stores;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Wires the shortener service over `stores` according to `config`.
pub fn build_state(config: &Config, stores: Stores) -> AppState {
    let rate_limiter = RateLimiter::new(stores.quotas, config.api_quota, config.quota_window());
    let stats = StatsCounter::new(stores.stats);

    let shortener = ShortenerService::new(
        stores.mappings,
        rate_limiter,
        stats,
        Arc::new(RandomCodeGenerator),
        config.shortener_options(),
    );

    AppState::new(Arc::new(shortener), config.behind_proxy)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Store backend (Redis or in-memory)
/// - Shortener service
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The store is unreachable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let stores = Stores::from_config(&config)
        .await
        .context("Failed to initialize store")?;

    let state = build_state(&config, stores);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

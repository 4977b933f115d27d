//! Axum server setup
//!
//! The listener starts before the pool exists: startup init (credential
//! resolution, pool construction, migrations) runs as a background task
//! and flips the shared state to ready when it completes. Until then every
//! data endpoint answers 503 and the health probe reports "initializing".

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use rosterd_core::secrets::vault::VaultClient;
use rosterd_core::{AppConfig, Resolver, SecretsConfig};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::db::{migrations, pool};
use crate::http::routes;
use crate::state::AppState;

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid bind address: {0}")]
    Addr(#[from] std::net::AddrParseError),
}

/// Build the application router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    // The frontend is served from elsewhere, so CORS stays permissive.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::users::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server.
pub async fn run_server(config: AppConfig) -> Result<(), ServerError> {
    let state = Arc::new(AppState::uninitialized());

    let init = tokio::spawn(init_database(state.clone(), config.clone()));
    let renewal = spawn_token_renewal(&config.secrets);

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop background work before reporting the shutdown.
    if let Some(handle) = renewal {
        handle.abort();
    }
    init.abort();

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolve credentials, construct the pool, run migrations, flip the state.
///
/// Failures leave the state as initializing: requests keep answering 503
/// (safe to retry) instead of crashing the process.
async fn init_database(state: Arc<AppState>, config: AppConfig) {
    let resolved = Resolver::from_config(&config.secrets).resolve().await;

    match pool::create_pool(&resolved.url, &config.pool).await {
        Ok(pool) => {
            if let Err(err) = migrations::run(&pool).await {
                tracing::error!(error = %err, "migrations failed");
                return;
            }
            state.set_ready(pool).await;
            tracing::info!(tier = %resolved.tier, "database pool ready");
        }
        Err(err) => {
            tracing::error!(error = %err, "database pool initialization failed");
        }
    }
}

/// Start the periodic Vault token renewal task when configured.
fn spawn_token_renewal(secrets: &SecretsConfig) -> Option<JoinHandle<()>> {
    if !secrets.auto_renew || !secrets.vault_enabled() {
        return None;
    }

    let client = VaultClient::new(
        secrets.vault_addr.clone()?,
        secrets.vault_token.clone()?,
    );
    let every = Duration::from_secs(secrets.renew_interval_hours * 60 * 60);
    tracing::info!(hours = secrets.renew_interval_hours, "vault token renewal scheduled");
    Some(client.spawn_renewal(every))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renewal_task_requires_auto_renew_and_vault() {
        let secrets = SecretsConfig {
            vault_addr: Some("http://vault:8200".into()),
            vault_token: Some("s.token".into()),
            auto_init: true,
            auto_renew: false,
            renew_interval_hours: 6,
            ..SecretsConfig::default()
        };
        assert!(spawn_token_renewal(&secrets).is_none());

        let secrets = SecretsConfig {
            auto_renew: true,
            ..SecretsConfig::default()
        };
        assert!(spawn_token_renewal(&secrets).is_none());
    }
}

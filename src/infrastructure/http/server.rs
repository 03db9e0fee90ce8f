//! HTTP server bootstrap.

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers::{delete_user, get_user, health, save_user, AppState};
use crate::adapters::memory::InMemoryUserRepository;
use crate::adapters::sqlite::{initialize_database, SqliteUserRepository};
use crate::domain::models::Config;
use crate::services::{DynUserStore, UserService};

/// Build the application router around a shared service.
pub fn router(service: AppState) -> Router {
    Router::new()
        .route("/users", post(save_user))
        .route("/users/{id}", get(get_user).delete(delete_user))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Build the cached user service for `config`.
///
/// `ephemeral` swaps SQLite for the in-memory store.
pub async fn build_service(config: &Config, ephemeral: bool) -> Result<AppState> {
    let store: Arc<DynUserStore> = if ephemeral {
        info!("Using in-memory user store");
        Arc::new(InMemoryUserRepository::new())
    } else {
        info!("Database path: {}", config.database.path);
        let pool = initialize_database(&config.database)
            .await
            .context("Failed to initialize database")?;
        Arc::new(SqliteUserRepository::new(pool))
    };

    Ok(Arc::new(UserService::with_config(store, &config.cache)))
}

/// Start the HTTP server and run until ctrl-c.
pub async fn serve(config: &Config, ephemeral: bool) -> Result<()> {
    info!("Starting user cache HTTP server");

    let service = build_service(config, ephemeral).await?;
    let app = router(service);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated with an error")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

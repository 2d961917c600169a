//! TikTok business messaging relay.
//!
//! ```text
//! TikTok  --webhook-->  /webhook                  (verify handshake, observe-only ingest)
//! caller  --------->    /api/messages/send        --> messaging API
//! caller  --------->    /api/marketing/campaigns  --> marketing API
//! caller  --------->    /api/marketing/report     --> marketing API
//! ```

pub mod cors;
pub mod error;
pub mod http;
pub mod query;
pub mod reqid;
pub mod webhook;

use std::sync::Arc;

use anyhow::Result;
use axum::{Router, http::StatusCode, middleware, response::IntoResponse, routing::get};
use tbm_core::{Config, MarketingClient, MessagingClient};
use tokio::net::TcpListener;
use tracing::info;

pub use error::RelayError;

/// Shared, read-only handler state. Cloning is cheap: the config is behind
/// an `Arc` and the clients share one connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub messaging: MessagingClient,
    pub marketing: MarketingClient,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        let http = reqwest::Client::new();
        Self {
            messaging: MessagingClient::new(http.clone(), config.clone()),
            marketing: MarketingClient::new(http, config.clone()),
            config,
        }
    }
}

/// Builds the full router. The webhook and health routes are registered
/// without the CORS wrapper.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", get(webhook::verify).post(webhook::receive))
        .route("/healthz", get(healthz))
        .merge(http::api_router())
        .layer(middleware::from_fn(reqid::with_request_id))
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C or SIGTERM.
pub async fn run(config: Arc<Config>) -> Result<()> {
    let addr = config.listen_addr()?;
    if config.verify_token.is_empty() {
        tracing::warn!("VERIFY_TOKEN is empty; webhook verification accepts an empty token");
    }
    let router = build_router(AppState::new(config));
    let listener = TcpListener::bind(addr).await?;
    info!("tbm-relay listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
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
    info!("shutdown signal received");
}

//! HTTP API server for the companion gateway

pub mod chat;
mod error;
pub mod health;
pub mod voice;

pub use error::ApiError;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::provider::ProviderClient;
use crate::speech::SpeechTranscriber;
use crate::{Error, Result};

/// Shared state for API handlers
#[derive(Debug)]
pub struct ApiState {
    pub provider: ProviderClient,
    pub transcriber: SpeechTranscriber,
}

impl ApiState {
    /// Create handler state
    #[must_use]
    pub const fn new(provider: ProviderClient, transcriber: SpeechTranscriber) -> Self {
        Self {
            provider,
            transcriber,
        }
    }
}

/// Build the router with all routes, CORS limited to `cors_origin`
///
/// # Errors
///
/// Returns error if `cors_origin` is not a valid header value
pub fn router(state: Arc<ApiState>, cors_origin: &str) -> Result<Router> {
    let origin = HeaderValue::from_str(cors_origin)
        .map_err(|e| Error::Config(format!("invalid CORS origin {cors_origin}: {e}")))?;

    // Credentials rule out wildcards, so mirror the preflight. Other origins
    // get no allow-origin header at all.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |request_origin, _| {
            *request_origin == origin
        }))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    Ok(Router::new()
        .merge(health::router())
        .merge(health::status_router(state.clone()))
        .merge(chat::router(state.clone()))
        .merge(voice::router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// API server
#[derive(Debug)]
pub struct ApiServer {
    state: Arc<ApiState>,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a server for `state`
    #[must_use]
    pub fn new(state: ApiState, config: ServerConfig) -> Self {
        Self {
            state: Arc::new(state),
            config,
        }
    }

    /// Run the API server until Ctrl-C
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let router = router(self.state.clone(), &self.config.cors_origin)?;

        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Config(format!("failed to bind API server on {addr}: {e}")))?;

        tracing::info!(
            addr = %addr,
            provider = self.state.provider.provider_name(),
            transcriber = self.state.transcriber.is_available(),
            cors_origin = %self.config.cors_origin,
            "API server listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Config(format!("API server error: {e}")))?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

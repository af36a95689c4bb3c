//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the webhook and health handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Adapt HTTP requests into `InboundRequest`s for the relay handler
//! - Serve until the shutdown notice arrives

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::Instrument;

use crate::config::RelayConfig;
use crate::http::request::{InboundRequest, X_REQUEST_ID};
use crate::http::response::RelayResponse;
use crate::lifecycle::shutdown;
use crate::relay::{handler, Forwarder};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub forwarder: Forwarder,
}

/// HTTP front end for the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: Arc<RelayConfig>, forwarder: Forwarder) -> Self {
        let router = Self::build_router(AppState { config, forwarder });
        Self { router }
    }

    /// The fully layered router, for serving or for driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let request_timeout = Duration::from_secs(state.config.timeouts.request_secs);
        let body_limit = state.config.security.max_body_size;

        Router::new()
            .route("/", post(webhook_handler))
            .route("/webhooks", post(webhook_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(RequestBodyLimitLayer::new(body_limit))
            .layer(TimeoutLayer::new(request_timeout))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::recv(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> RelayResponse {
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let span = tracing::info_span!("webhook", request_id = %request_id);

    let request = InboundRequest::from_http(&headers, body);
    handler::handle(&state.config, &state.forwarder, request)
        .instrument(span)
        .await
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

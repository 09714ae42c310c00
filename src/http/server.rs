//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, body limit, timeout, request ID, metrics)
//! - Bind server to listener
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{DefaultBodyLimit, MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::PlannerConfig;
use crate::http::handlers;
use crate::maps::{MapsClient, MapsResult};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PlannerConfig>,
    pub maps: MapsClient,
}

impl AppState {
    /// Build state from configuration, creating the provider client.
    pub fn from_config(config: PlannerConfig) -> MapsResult<Self> {
        let maps = MapsClient::new(
            &config.maps,
            config.directions.mode,
            &config.timeouts,
            &config.retries,
        )?;

        Ok(Self {
            config: Arc::new(config),
            maps,
        })
    }
}

/// HTTP server for the route planner.
pub struct HttpServer {
    router: Router,
    config: Arc<PlannerConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: PlannerConfig) -> MapsResult<Self> {
        let state = AppState::from_config(config)?;
        tracing::debug!(maps = ?state.maps, "Maps client initialized");

        let config = state.config.clone();
        let router = build_router(state);
        Ok(Self { router, config })
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_upload_bytes = self.config.uploads.max_bytes,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.uploads.max_bytes;
    let request_timeout = Duration::from_secs(state.config.timeouts.request_secs);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/check_addresses", post(handlers::check_addresses))
        .route("/optimize", post(handlers::optimize))
        .route("/optimize/plan", post(handlers::optimize_plan))
        .route_layer(middleware::from_fn(track_metrics))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(request).await;
    metrics::record_request(&endpoint, response.status().as_u16(), start);
    response
}

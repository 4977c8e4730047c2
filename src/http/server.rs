//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the redirect handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener and shut down gracefully
//! - Per request: fetch rows, build a table, resolve the path, redirect
//! - Observability (metrics, correlation IDs)

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RedirectorConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response;
use crate::observability::metrics;
use crate::sheets::RowSource;
use crate::shortcuts::{self, MatchOptions, PathResolver, Resolution};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RowSource>,
    pub resolver: PathResolver,
    pub redirect_status: StatusCode,
}

/// HTTP server for the redirector.
pub struct HttpServer {
    router: Router,
    config: RedirectorConfig,
}

impl HttpServer {
    /// Create a new HTTP server reading shortcuts from `source`.
    pub fn new(config: RedirectorConfig, source: Arc<dyn RowSource>) -> Self {
        let redirect_status = StatusCode::from_u16(config.resolver.redirect_status)
            .ok()
            .filter(StatusCode::is_redirection)
            .unwrap_or(StatusCode::MOVED_PERMANENTLY);

        let state = AppState {
            source,
            resolver: PathResolver::new(MatchOptions {
                fold_case: config.resolver.fold_path_case,
            }),
            redirect_status,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RedirectorConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(path_handler))
            .route("/", any(root_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %request_id(req.headers()),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RedirectorConfig {
        &self.config
    }
}

async fn path_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    // The wildcard capture has already consumed the route's leading `/`.
    resolve_request(&state, &format!("/{path}"), &headers).await
}

async fn root_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    resolve_request(&state, "/", &headers).await
}

/// Fetch a fresh table and resolve `path` against it.
async fn resolve_request(state: &AppState, path: &str, headers: &HeaderMap) -> Response {
    let started = Instant::now();
    let request_id = request_id(headers);

    let rows = match state.source.fetch_rows().await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(request_id = %request_id, path = %path, error = %e, "Failed to load shortcut table");
            metrics::record_resolution("source_error", started);
            return response::upstream_unavailable();
        }
    };

    let report = shortcuts::build(rows);
    metrics::record_table_build(&report);

    match state.resolver.resolve(&report.table, path) {
        Resolution::Found { key, target } => {
            tracing::info!(
                request_id = %request_id,
                path = %path,
                key = %key,
                target = %target,
                absolute = target.is_absolute(),
                "Redirecting"
            );
            metrics::record_resolution("found", started);
            response::redirect(state.redirect_status, target)
        }
        Resolution::NotFound => {
            tracing::info!(request_id = %request_id, path = %path, "No shortcut matched");
            metrics::record_resolution("not_found", started);
            response::not_found()
        }
    }
}

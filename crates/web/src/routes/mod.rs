//! HTTP route handlers for the greeter.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Redirect to /home
//! GET  /home             - Landing page
//! GET  /greet?name=      - Register a visit, name from the query (default "World!")
//! GET  /greet/{name}     - Register a visit, name from the path
//! GET  /list?page&size   - Page of registered visitors (defaults 0 and 5)
//! GET  /health           - Liveness check
//! GET  /health/ready     - Readiness check (store reachable)
//! GET  /static/*         - Stylesheet and other assets
//! ```

pub mod greeting;
pub mod health;
pub mod home;
pub mod visitors;

use axum::{Router, http::Uri, middleware::from_fn, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the page routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/home", get(home::home))
        .route("/greet", get(greeting::greet))
        .route("/greet/{name}", get(greeting::greet_path))
        .route("/list", get(visitors::list))
}

/// Build the full application: pages, health checks, static files, tracing
/// and request ids.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(not_found)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

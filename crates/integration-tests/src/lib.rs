//! Integration tests for the visitor greeter.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process and live-server tests (in-memory store)
//! cargo test -p greeter-integration-tests
//!
//! # PostgreSQL tests (migrations must have been run)
//! GREETER_DATABASE_URL=postgres://... cargo test -p greeter-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `router` - Requests driven straight through the router
//! - `server` - Real HTTP over a bound socket via `reqwest`
//! - `postgres_store` - `PgVisitorStore` against a live database

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use greeter_web::config::GreeterConfig;
use greeter_web::db::{MemoryVisitorStore, VisitorStore};
use greeter_web::routes;
use greeter_web::state::AppState;

/// Build the application over a fresh in-memory store.
#[must_use]
pub fn memory_app() -> (Router, MemoryVisitorStore) {
    let store = MemoryVisitorStore::new();
    let app = app_with_store(Arc::new(store.clone()));
    (app, store)
}

/// Build the application over any store with default configuration.
#[must_use]
pub fn app_with_store(store: Arc<dyn VisitorStore>) -> Router {
    routes::app(AppState::new(GreeterConfig::default(), store))
}

/// Serve the application on an ephemeral local port.
///
/// The server runs until the test's runtime shuts down.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn spawn_server(app: Router) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok(addr)
}

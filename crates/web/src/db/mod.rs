//! Visitor persistence.
//!
//! # Database: `greeter`
//!
//! ## Tables
//!
//! - `greeter.visitor` - One row per distinct visitor name with its visit count
//!
//! # Stores
//!
//! Handlers and services only see the [`VisitorStore`] trait. Two stores
//! implement it:
//!
//! - [`PgVisitorStore`] - `PostgreSQL` via `sqlx`
//! - [`MemoryVisitorStore`] - in-process, for tests and local demos
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p greeter-cli -- migrate
//! ```

pub mod memory;
pub mod visitors;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use greeter_core::{Page, PageRequest, VisitCountOverflow, Visitor};

pub use memory::MemoryVisitorStore;
pub use visitors::PgVisitorStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate visitor name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl From<VisitCountOverflow> for RepositoryError {
    fn from(err: VisitCountOverflow) -> Self {
        Self::DataCorruption(err.to_string())
    }
}

/// A store of visitors.
#[async_trait]
pub trait VisitorStore: Send + Sync {
    /// Open a transaction. Writes made through it are discarded unless it is committed.
    async fn begin(&self) -> Result<Box<dyn VisitorTransaction>, RepositoryError>;

    /// Read one page of visitors in the requested order, ties broken by id.
    async fn find_all(&self, page: PageRequest) -> Result<Page<Visitor>, RepositoryError>;

    /// Check that the store can serve requests.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Reads and writes scoped to one store transaction.
#[async_trait]
pub trait VisitorTransaction: Send {
    /// Find a visitor by exact name.
    ///
    /// Also locks the name until the transaction ends, so concurrent
    /// transactions touching the same name run one after another.
    async fn find_by_name(&mut self, name: &str) -> Result<Option<Visitor>, RepositoryError>;

    /// Insert the visitor if it has no id, otherwise update it. Returns the stored row.
    async fn save(&mut self, visitor: Visitor) -> Result<Visitor, RepositoryError>;

    /// Make the transaction's writes visible.
    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2_u32.min(max_connections))
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

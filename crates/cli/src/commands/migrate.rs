//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! greeter-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `GREETER_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/web/migrations/` and are embedded at compile
//! time.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

/// Errors raised while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the greeter database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url =
        super::database_url().ok_or(MigrationError::MissingEnvVar("GREETER_DATABASE_URL"))?;

    tracing::info!("Connecting to greeter database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running greeter migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Greeter migrations complete!");
    Ok(())
}

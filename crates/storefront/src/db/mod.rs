//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `silkroots_storefront`
//!
//! ## Tables
//!
//! - `orders` - Order records (both card and crypto shapes, as JSONB)
//! - `tower_sessions.session` - Tower-sessions storage (cart, customer
//!   form, pickup selection)
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/storefront/migrations/` and run on
//! startup via `sqlx::migrate!`.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod orders;

pub use orders::{InsertOutcome, OrderRepository, OrderStore};

/// Errors surfaced by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Query execution failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored record could not be (de)serialized.
    #[error("invalid record in database: {0}")]
    DataCorruption(#[from] serde_json::Error),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run embedded migrations.
///
/// # Errors
///
/// Returns an error if any migration fails to apply.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

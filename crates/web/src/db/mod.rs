//! Database access layer.
//!
//! One `PgPool` is created at startup from the `DB_*` configuration and
//! handed to every repository through [`crate::state::AppState`]. Every
//! statement in this module tree is parameterized with `$n` binds; caller
//! data is never interpolated into SQL text.
//!
//! # Tables
//!
//! - `users` - Accounts (customers and back-office staff)
//! - `categories`, `products` - Catalog
//! - `cart_items` - Session-scoped carts
//! - `orders`, `order_items` - Orders with price/address snapshots
//! - `blog_categories`, `blog_posts` - Blog content
//! - `certificates`, `gallery_items` - Content pages
//! - `shipping_zones`, `shipping_methods` - Shipping configuration
//!
//! # Migrations
//!
//! Migrations live in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p thistle-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::config::DatabaseConfig;

pub mod blog;
pub mod cart;
pub mod categories;
pub mod content;
pub mod orders;
pub mod products;
pub mod shipping;
pub mod users;

/// Error type shared by all repositories.
#[derive(Debug, thiserror::Error)]
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

    /// Constraint violation (e.g., unique slug, referenced category).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning a unique violation into `Conflict`.
    pub(crate) fn from_unique(e: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::Database(e)
    }
}

/// Build `PostgreSQL` connection options from discrete `DB_*` settings.
#[must_use]
pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .username(&config.user)
        .password(config.password.expose_secret())
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// Connects eagerly so configuration and connectivity failures surface at
/// startup rather than on the first request.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options(config))
        .await
}

/// Create a pool without connecting.
///
/// Used by router tests that exercise dispatch and middleware rejection
/// paths which never touch the database.
#[must_use]
pub fn lazy_pool(config: &DatabaseConfig) -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy_with(connect_options(config))
}

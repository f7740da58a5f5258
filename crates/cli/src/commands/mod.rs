//! CLI subcommands.

pub mod admin;
pub mod migrate;
pub mod seed;

use sqlx::PgPool;
use thistle_web::config::AppConfig;
use thistle_web::db;

/// Load configuration and open a database pool.
///
/// # Errors
///
/// Returns an error if required `DB_*` variables are missing or the
/// database is unreachable.
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database).await?;

    Ok(pool)
}

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use storefinder_core::AppConfig;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Relative to this crate's manifest.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections.min(config.db_max_connections),
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
    /// A row decoded but does not describe a valid domain store.
    #[error("invalid store row {id}: {reason}")]
    InvalidRow { id: i64, reason: String },
}

/// Open a pool against `database_url`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] when no connection can be opened within the
/// acquire timeout.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Open the catalog pool described by `config`.
///
/// # Errors
///
/// Returns [`DbError::MissingDatabaseUrl`] when `DATABASE_URL` is unset, or
/// [`DbError::Sqlx`] when the database cannot be reached.
pub async fn connect_pool_from_config(config: &AppConfig) -> Result<PgPool, DbError> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or(DbError::MissingDatabaseUrl)?;
    let pool = connect_pool(database_url, PoolConfig::from_app_config(config)).await?;
    tracing::debug!(
        max_connections = config.db_max_connections,
        "store catalog pool connected"
    );
    Ok(pool)
}

/// Apply the embedded `migrations/` directory and return how many
/// migrations were new.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if a migration fails; the
/// failing migration is rolled back.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, sqlx::migrate::MigrateError> {
    let before = successful_migrations(pool).await;
    MIGRATOR.run(pool).await?;
    let after = successful_migrations(pool).await;
    Ok(usize::try_from(after.saturating_sub(before)).unwrap_or(0))
}

/// Zero on a fresh database, where the bookkeeping table is missing.
async fn successful_migrations(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
        .fetch_one(pool)
        .await
        .unwrap_or(0)
}

/// Round-trip a trivial query.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Readiness of the geospatial catalog: the database answers and PostGIS
/// is installed. Returns the PostGIS version string.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the database is unreachable or the
/// `postgis` extension is missing.
pub async fn health_check(pool: &PgPool) -> Result<String, DbError> {
    let version = sqlx::query_scalar::<_, String>("SELECT postgis_lib_version()")
        .fetch_one(pool)
        .await?;
    Ok(version)
}


pub mod stores;

pub use stores::{
    count_active_stores, find_nearest_store, get_store_by_code, list_nearby_stores,
    upsert_stores, StoreRow,
};

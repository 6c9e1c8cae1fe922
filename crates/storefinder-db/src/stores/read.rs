//! Read operations for the `stores` table.

use sqlx::PgPool;
use storefinder_core::{Coordinates, Store, StoreType};

use super::types::{StoreRow, STORE_COLUMNS};
use crate::DbError;

/// Active stores of `store_type` within `radius_meters` of `center`,
/// nearest first and then by id.
///
/// Distances are geodesic (PostGIS `geography`), so the radius is in meters
/// on the WGS84 spheroid.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if a row cannot be turned into a [`Store`].
pub async fn list_nearby_stores(
    pool: &PgPool,
    center: Coordinates,
    store_type: StoreType,
    radius_meters: f64,
) -> Result<Vec<Store>, DbError> {
    let sql = format!(
        "SELECT {STORE_COLUMNS} \
         FROM stores \
         WHERE is_active = TRUE \
           AND store_type = $3 \
           AND ST_DWithin(location, ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography, $4) \
         ORDER BY ST_Distance(location, ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography), id"
    );

    let rows = sqlx::query_as::<_, StoreRow>(&sql)
        .bind(center.longitude)
        .bind(center.latitude)
        .bind(store_type.as_code())
        .bind(radius_meters)
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(Store::try_from).collect()
}

/// The single active store of any type closest to `center`, with no
/// distance limit. Ties go to the lowest id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if the row cannot be turned into a [`Store`].
pub async fn find_nearest_store(
    pool: &PgPool,
    center: Coordinates,
) -> Result<Option<Store>, DbError> {
    let sql = format!(
        "SELECT {STORE_COLUMNS} \
         FROM stores \
         WHERE is_active = TRUE \
         ORDER BY ST_Distance(location, ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography), id \
         LIMIT 1"
    );

    let row = sqlx::query_as::<_, StoreRow>(&sql)
        .bind(center.longitude)
        .bind(center.latitude)
        .fetch_optional(pool)
        .await?;

    row.map(Store::try_from).transpose()
}

/// Fetch a single store by its unique catalog code.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if the row cannot be turned into a [`Store`].
pub async fn get_store_by_code(pool: &PgPool, code: &str) -> Result<Option<Store>, DbError> {
    let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE code = $1");

    let row = sqlx::query_as::<_, StoreRow>(&sql)
        .bind(code)
        .fetch_optional(pool)
        .await?;

    row.map(Store::try_from).transpose()
}

/// Number of active stores.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_active_stores(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stores WHERE is_active = TRUE")
        .fetch_one(pool)
        .await
}

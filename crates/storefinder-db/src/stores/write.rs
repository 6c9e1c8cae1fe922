//! Write operations for the `stores` table.

use sqlx::PgPool;
use storefinder_core::{PostalCode, StoreEntry};

use crate::DbError;

/// Insert or update catalog stores keyed by `code`.
///
/// Returns `(inserted, updated)`. All rows are written in one transaction;
/// if any statement fails the whole batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails, or
/// [`DbError::InvalidRow`] when an entry's postal code is malformed.
pub async fn upsert_stores(pool: &PgPool, entries: &[StoreEntry]) -> Result<(u64, u64), DbError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;
    let mut updated = 0u64;

    for entry in entries {
        let postal_code = PostalCode::parse(&entry.postal_code).map_err(|e| DbError::InvalidRow {
            id: 0,
            reason: format!("store '{}': {e}", entry.code),
        })?;
        let shipping_time_days = i32::try_from(entry.shipping_time_days).unwrap_or(i32::MAX);

        // `xmax = 0` is true only for freshly inserted tuples.
        let was_insert: bool = sqlx::query_scalar(
            "INSERT INTO stores \
                 (code, name, store_type, street, number, district, city, state, country, \
                  postal_code, location, phone, email, takeout_in_store, shipping_time_days, \
                  is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, \
                     ST_SetSRID(ST_MakePoint($11, $12), 4326)::geography, \
                     $13, $14, $15, $16, $17) \
             ON CONFLICT (code) DO UPDATE SET \
                 name               = EXCLUDED.name, \
                 store_type         = EXCLUDED.store_type, \
                 street             = EXCLUDED.street, \
                 number             = EXCLUDED.number, \
                 district           = EXCLUDED.district, \
                 city               = EXCLUDED.city, \
                 state              = EXCLUDED.state, \
                 country            = EXCLUDED.country, \
                 postal_code        = EXCLUDED.postal_code, \
                 location           = EXCLUDED.location, \
                 phone              = EXCLUDED.phone, \
                 email              = EXCLUDED.email, \
                 takeout_in_store   = EXCLUDED.takeout_in_store, \
                 shipping_time_days = EXCLUDED.shipping_time_days, \
                 is_active          = EXCLUDED.is_active, \
                 updated_at         = NOW() \
             RETURNING (xmax = 0)",
        )
        .bind(&entry.code)
        .bind(&entry.name)
        .bind(entry.store_type.as_code())
        .bind(&entry.street)
        .bind(&entry.number)
        .bind(&entry.district)
        .bind(&entry.city)
        .bind(&entry.state)
        .bind(&entry.country)
        .bind(postal_code.as_str())
        .bind(entry.longitude)
        .bind(entry.latitude)
        .bind(&entry.phone)
        .bind(&entry.email)
        .bind(entry.takeout_in_store)
        .bind(shipping_time_days)
        .bind(entry.active)
        .fetch_one(&mut *tx)
        .await?;

        if was_insert {
            inserted += 1;
        } else {
            updated += 1;
        }
    }

    tx.commit().await?;
    tracing::info!(inserted, updated, "store catalog upserted");
    Ok((inserted, updated))
}

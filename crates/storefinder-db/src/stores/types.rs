//! Row types for the `stores` table.

use chrono::{DateTime, Utc};
use storefinder_core::{Coordinates, Store, StoreAddress, StoreType};

use crate::DbError;

/// Column list shared by every `stores` read. The geography point is split
/// back into plain latitude/longitude.
pub(crate) const STORE_COLUMNS: &str = "id, code, name, store_type, street, number, district, \
     city, state, country, postal_code, \
     ST_Y(location::geometry) AS latitude, ST_X(location::geometry) AS longitude, \
     phone, email, takeout_in_store, shipping_time_days, is_active, created_at, updated_at";

/// A row from the `stores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreRow {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub store_type: String,
    pub street: String,
    pub number: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub takeout_in_store: bool,
    pub shipping_time_days: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<StoreRow> for Store {
    type Error = DbError;

    fn try_from(row: StoreRow) -> Result<Self, Self::Error> {
        let invalid = |reason: String| DbError::InvalidRow { id: row.id, reason };

        let store_type: StoreType = row
            .store_type
            .parse()
            .map_err(|e: storefinder_core::CoreError| invalid(e.to_string()))?;
        let shipping_time_days = u32::try_from(row.shipping_time_days)
            .map_err(|_| invalid(format!("negative shipping time {}", row.shipping_time_days)))?;

        Ok(Store {
            id: row.id,
            code: row.code,
            name: row.name,
            store_type,
            address: StoreAddress {
                street: row.street,
                number: row.number,
                district: row.district,
                city: row.city,
                state: row.state,
                country: row.country,
                postal_code: row.postal_code,
            },
            location: Coordinates {
                latitude: row.latitude,
                longitude: row.longitude,
            },
            phone: row.phone,
            email: row.email,
            takeout_in_store: row.takeout_in_store,
            shipping_time_days,
            is_active: row.is_active,
        })
    }
}

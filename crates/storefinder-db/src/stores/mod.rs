//! Database operations for the `stores` table.

mod read;
mod types;
mod write;

pub use read::{count_active_stores, find_nearest_store, get_store_by_code, list_nearby_stores};
pub use types::StoreRow;
pub use write::upsert_stores;

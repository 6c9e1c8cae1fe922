//! Store catalog held in memory, used when no database is configured.

use std::cmp::Ordering;

use async_trait::async_trait;
use storefinder_core::{great_circle_km, Coordinates, Store, StoreType};
use storefinder_db::DbError;

use crate::ports::StoreCatalog;

/// Linear-scan catalog ranked by great-circle distance. Fine for the few
/// hundred stores a YAML catalog carries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    stores: Vec<Store>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new(stores: Vec<Store>) -> Self {
        Self { stores }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Active stores passing `keep`, nearest first, ties by id.
    fn ranked<'a>(
        &'a self,
        center: Coordinates,
        keep: impl Fn(&Store, f64) -> bool,
    ) -> Vec<(f64, &'a Store)> {
        let mut ranked: Vec<(f64, &Store)> = self
            .stores
            .iter()
            .filter(|store| store.is_active)
            .map(|store| (great_circle_km(center, store.location) * 1000.0, store))
            .filter(|(meters, store)| keep(store, *meters))
            .collect();
        ranked.sort_by(|(da, a), (db, b)| {
            da.partial_cmp(db)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        ranked
    }
}

#[async_trait]
impl StoreCatalog for InMemoryCatalog {
    async fn nearby(
        &self,
        center: Coordinates,
        store_type: StoreType,
        radius_meters: f64,
    ) -> Result<Vec<Store>, DbError> {
        Ok(self
            .ranked(center, |store, meters| {
                store.store_type == store_type && meters <= radius_meters
            })
            .into_iter()
            .map(|(_, store)| store.clone())
            .collect())
    }

    async fn nearest_any(&self, center: Coordinates) -> Result<Option<Store>, DbError> {
        Ok(self
            .ranked(center, |_, _| true)
            .into_iter()
            .next()
            .map(|(_, store)| store.clone()))
    }
}

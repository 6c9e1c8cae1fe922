//! Tiered nearest-store query.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use storefinder_core::{Coordinates, FinderError, Store, StoreType};
use storefinder_db::DbError;

use crate::ports::StoreCatalog;

const SERVICE: &str = "store catalog";

/// Which fallback stage produced the candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Drop-off points within the search radius.
    DropoffPoints,
    /// Full stores within the search radius.
    FullStores,
    /// The single nearest active store, no radius bound.
    NearestAny,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::DropoffPoints => write!(f, "dropoff_points"),
            Tier::FullStores => write!(f, "full_stores"),
            Tier::NearestAny => write!(f, "nearest_any"),
        }
    }
}

/// Candidates of the first non-empty tier.
#[derive(Debug, Clone)]
pub struct TierMatch {
    pub tier: Tier,
    pub stores: Vec<Store>,
}

pub struct ProximityIndex {
    catalog: Arc<dyn StoreCatalog>,
    radius_meters: f64,
}

impl ProximityIndex {
    #[must_use]
    pub fn new(catalog: Arc<dyn StoreCatalog>, radius_meters: f64) -> Self {
        Self {
            catalog,
            radius_meters,
        }
    }

    /// Active stores of one type within `radius_meters`, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::ExternalService`] if the catalog query fails.
    pub async fn nearby(
        &self,
        center: Coordinates,
        store_type: StoreType,
        radius_meters: f64,
    ) -> Result<Vec<Store>, FinderError> {
        self.catalog
            .nearby(center, store_type, radius_meters)
            .await
            .map_err(catalog_error)
    }

    /// Drop-off points in radius, else full stores in radius, else the
    /// globally nearest store. The first two tiers never mix types and the
    /// last yields exactly one store.
    ///
    /// # Errors
    ///
    /// - [`FinderError::NotFound`] when the catalog has no active store.
    /// - [`FinderError::ExternalService`] if a catalog query fails.
    pub async fn tiered(&self, center: Coordinates) -> Result<TierMatch, FinderError> {
        for (tier, store_type) in [
            (Tier::DropoffPoints, StoreType::DropoffPoint),
            (Tier::FullStores, StoreType::FullStore),
        ] {
            let stores = self.nearby(center, store_type, self.radius_meters).await?;
            tracing::debug!(%tier, found = stores.len(), "tier queried");
            if !stores.is_empty() {
                return Ok(TierMatch { tier, stores });
            }
        }

        let nearest = self
            .catalog
            .nearest_any(center)
            .await
            .map_err(catalog_error)?
            .ok_or_else(|| FinderError::NotFound("no stores registered".to_string()))?;

        Ok(TierMatch {
            tier: Tier::NearestAny,
            stores: vec![nearest],
        })
    }
}

fn catalog_error(e: DbError) -> FinderError {
    tracing::error!(error = %e, "store catalog query failed");
    FinderError::ExternalService {
        service: SERVICE,
        message: e.to_string(),
    }
}

//! End-to-end nearest-store lookup.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use storefinder_core::{
    Address, Coordinates, EnrichmentFailure, FinderError, FinderSettings, PostalCode, Store,
    StoreCandidate,
};
use tokio::time::{timeout_at, Instant};

use crate::address::AddressResolver;
use crate::geocoder::Geocoder;
use crate::ports::{
    AddressLookup, DirectionsProvider, GeocodingProvider, ShippingRateProvider, StoreCatalog,
};
use crate::proximity::{ProximityIndex, Tier, TierMatch};
use crate::route::RouteCalculator;
use crate::shipping::ShippingQuoteResolver;

/// Ranked result of one lookup. `candidates` is never empty.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyStores {
    pub postal_code: PostalCode,
    pub address: Address,
    pub origin: Coordinates,
    pub tier: Tier,
    pub candidates: Vec<StoreCandidate>,
}

/// Collaborators of a [`NearestStoreFinder`], one per external dependency.
pub struct FinderPorts {
    pub address: Arc<dyn AddressLookup>,
    pub geocoding: Arc<dyn GeocodingProvider>,
    pub catalog: Arc<dyn StoreCatalog>,
    pub directions: Arc<dyn DirectionsProvider>,
    pub shipping: Arc<dyn ShippingRateProvider>,
}

pub struct NearestStoreFinder {
    addresses: AddressResolver,
    geocoder: Geocoder,
    index: ProximityIndex,
    routes: RouteCalculator,
    quotes: ShippingQuoteResolver,
    max_concurrent: usize,
    budget: Duration,
}

impl NearestStoreFinder {
    #[must_use]
    pub fn new(ports: FinderPorts, settings: FinderSettings) -> Self {
        Self {
            addresses: AddressResolver::new(ports.address),
            geocoder: Geocoder::new(ports.geocoding),
            index: ProximityIndex::new(ports.catalog, settings.search_radius_meters),
            routes: RouteCalculator::new(ports.directions, settings.fallback_speed_kmh),
            max_concurrent: settings.max_concurrent_candidates.max(1),
            budget: Duration::from_millis(settings.request_budget_ms),
            quotes: ShippingQuoteResolver::new(ports.shipping, settings),
        }
    }

    /// Resolves `raw_postal_code` and returns the stores of the first
    /// non-empty tier, enriched and sorted by distance then store id.
    ///
    /// Address, geocoding and catalog failures end the request. Stores that
    /// cannot be enriched before the request budget runs out are dropped.
    ///
    /// # Errors
    ///
    /// - [`FinderError::Validation`] for a malformed postal code, before
    ///   any network call.
    /// - [`FinderError::NotFound`] when the address is unknown, the catalog
    ///   is empty, or every candidate was dropped.
    /// - [`FinderError::ExternalService`] when address lookup, geocoding
    ///   or the catalog fail, or the budget runs out before candidates
    ///   are known.
    pub async fn find_nearby_stores(
        &self,
        raw_postal_code: &str,
    ) -> Result<NearbyStores, FinderError> {
        let postal_code = PostalCode::parse(raw_postal_code)?;
        let deadline = Instant::now() + self.budget;

        let (address, origin, matched) = self.locate(&postal_code, deadline).await?;

        tracing::info!(
            postal_code = %postal_code,
            tier = %matched.tier,
            candidates = matched.stores.len(),
            "candidate tier selected"
        );

        let outcomes: Vec<Result<StoreCandidate, EnrichmentFailure>> =
            stream::iter(matched.stores)
                .map(|store| self.enrich(store, origin, &postal_code, deadline))
                .buffer_unordered(self.max_concurrent)
                .collect()
                .await;

        let mut candidates = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Ok(candidate) => candidates.push(candidate),
                Err(failure) => {
                    tracing::warn!(
                        store_id = failure.store_id,
                        reason = %failure.reason,
                        "candidate dropped: {failure}"
                    );
                }
            }
        }

        if candidates.is_empty() {
            return Err(FinderError::NotFound(format!(
                "no store could be quoted for postal code {postal_code}"
            )));
        }

        rank(&mut candidates);

        Ok(NearbyStores {
            postal_code,
            address,
            origin,
            tier: matched.tier,
            candidates,
        })
    }

    /// Sequential phase: address, coordinates, then the tiered query. Each
    /// stage shares `deadline` and an overrun names the stage that stalled.
    async fn locate(
        &self,
        postal_code: &PostalCode,
        deadline: Instant,
    ) -> Result<(Address, Coordinates, TierMatch), FinderError> {
        let address = self
            .stage(deadline, "address lookup", self.addresses.resolve_postal_code(postal_code))
            .await?;
        let origin = self
            .stage(deadline, "geocoding", self.geocoder.geocode(&address))
            .await?;
        tracing::debug!(
            postal_code = %postal_code,
            latitude = origin.latitude,
            longitude = origin.longitude,
            "origin geocoded"
        );
        let matched = self
            .stage(deadline, "store catalog", self.index.tiered(origin))
            .await?;
        Ok((address, origin, matched))
    }

    async fn stage<T>(
        &self,
        deadline: Instant,
        service: &'static str,
        work: impl Future<Output = Result<T, FinderError>>,
    ) -> Result<T, FinderError> {
        timeout_at(deadline, work)
            .await
            .map_err(|_| FinderError::ExternalService {
                service,
                message: format!(
                    "no answer within the {} ms request budget",
                    self.budget.as_millis()
                ),
            })?
    }

    /// Route and quote one store concurrently, under the request deadline.
    async fn enrich(
        &self,
        store: Store,
        origin: Coordinates,
        destination: &PostalCode,
        deadline: Instant,
    ) -> Result<StoreCandidate, EnrichmentFailure> {
        if let Err(e) = store.location.validate() {
            return Err(failure(&store, e.to_string()));
        }

        let work = async {
            tokio::join!(
                self.routes.route(store.location, origin),
                self.quotes.quote(&store, destination),
            )
        };

        let outcome = timeout_at(deadline, work).await;
        match outcome {
            Ok((route, options)) => Ok(StoreCandidate {
                store,
                route,
                options,
            }),
            Err(_) => Err(failure(&store, "request budget exhausted".to_string())),
        }
    }
}

fn failure(store: &Store, reason: String) -> EnrichmentFailure {
    EnrichmentFailure {
        store_id: store.id,
        store_name: store.name.clone(),
        reason,
    }
}

/// Ascending distance; equal distances keep store id order.
fn rank(candidates: &mut [StoreCandidate]) {
    candidates.sort_by(|a, b| {
        a.route
            .distance_meters
            .cmp(&b.route.distance_meters)
            .then_with(|| a.store.id.cmp(&b.store.id))
    });
}

#[cfg(test)]
mod tests {
    use storefinder_core::{RouteResult, RouteSource, StoreAddress, StoreType};

    use super::*;

    fn candidate(id: i64, distance_meters: u64) -> StoreCandidate {
        StoreCandidate {
            store: Store {
                id,
                code: format!("s{id}"),
                name: format!("Store {id}"),
                store_type: StoreType::FullStore,
                address: StoreAddress {
                    street: "Rua".to_string(),
                    number: None,
                    district: "Centro".to_string(),
                    city: "São Paulo".to_string(),
                    state: "SP".to_string(),
                    country: "Brasil".to_string(),
                    postal_code: "01310100".to_string(),
                },
                location: Coordinates {
                    latitude: -23.55,
                    longitude: -46.63,
                },
                phone: None,
                email: None,
                takeout_in_store: true,
                shipping_time_days: 1,
                is_active: true,
            },
            route: RouteResult {
                distance_meters,
                duration_seconds: 0,
                source: RouteSource::Directions,
            },
            options: Vec::new(),
        }
    }

    #[test]
    fn rank_orders_by_distance_then_id() {
        let mut candidates = vec![
            candidate(4, 2_000),
            candidate(3, 1_000),
            candidate(1, 2_000),
            candidate(2, 500),
        ];
        rank(&mut candidates);
        let ids: Vec<i64> = candidates.iter().map(|c| c.store.id).collect();
        assert_eq!(ids, vec![2, 3, 1, 4]);
    }
}

//! Driving route with a great-circle fallback.

use std::sync::Arc;

use storefinder_core::{great_circle_km, Coordinates, RouteResult, RouteSource};
use storefinder_providers::ProviderError;

use crate::ports::DirectionsProvider;

pub struct RouteCalculator {
    directions: Arc<dyn DirectionsProvider>,
    fallback_speed_kmh: f64,
}

impl RouteCalculator {
    #[must_use]
    pub fn new(directions: Arc<dyn DirectionsProvider>, fallback_speed_kmh: f64) -> Self {
        Self {
            directions,
            fallback_speed_kmh,
        }
    }

    /// Provider route, or the great-circle estimate when the provider fails.
    /// Never errors: ranking always needs a distance.
    pub async fn route(&self, origin: Coordinates, destination: Coordinates) -> RouteResult {
        match self.try_provider(origin, destination).await {
            Ok(route) => route,
            Err(e) => {
                tracing::warn!(error = %e, "directions unavailable, using great-circle distance");
                self.fallback(origin, destination)
            }
        }
    }

    /// # Errors
    ///
    /// Any [`ProviderError`] from the directions provider.
    pub async fn try_provider(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteResult, ProviderError> {
        let route = self.directions.driving_route(origin, destination).await?;
        Ok(RouteResult {
            distance_meters: route.distance_meters,
            duration_seconds: route.duration_seconds,
            source: RouteSource::Directions,
        })
    }

    /// Haversine distance, with duration at the configured average speed.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn fallback(&self, origin: Coordinates, destination: Coordinates) -> RouteResult {
        let km = great_circle_km(origin, destination);
        let hours = km / self.fallback_speed_kmh;
        RouteResult {
            distance_meters: (km * 1000.0).round() as u64,
            duration_seconds: (hours * 3600.0).round() as u64,
            source: RouteSource::GreatCircle,
        }
    }
}

//! Seams between the pipeline and its external collaborators.
//!
//! Production implementations live in [`crate::adapters`]; tests plug in
//! in-process fakes.

use async_trait::async_trait;
use storefinder_core::{Address, Coordinates, PackageProfile, PostalCode, Store, StoreType};
use storefinder_db::DbError;
use storefinder_providers::{CarrierQuote, DrivingRoute, ProviderError};

/// Postal code to structured address.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// # Errors
    ///
    /// [`ProviderError::NotFound`] when the postal code is unknown; any
    /// other variant for transport or payload failures.
    async fn lookup(&self, postal_code: &PostalCode) -> Result<Address, ProviderError>;
}

/// Free-text address to coordinates (first result only).
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// # Errors
    ///
    /// Any [`ProviderError`], including [`ProviderError::NoResults`].
    async fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError>;
}

/// Driving distance and duration between two points.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// # Errors
    ///
    /// Any [`ProviderError`]; callers fall back to great-circle distance.
    async fn driving_route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<DrivingRoute, ProviderError>;
}

/// Carrier rate quotes for one parcel.
#[async_trait]
pub trait ShippingRateProvider: Send + Sync {
    /// # Errors
    ///
    /// Any [`ProviderError`]; callers turn it into zero options.
    async fn quote(
        &self,
        from: &PostalCode,
        to: &PostalCode,
        package: &PackageProfile,
        services: &[String],
    ) -> Result<Vec<CarrierQuote>, ProviderError>;
}

/// Read-only geospatial view over active stores.
#[async_trait]
pub trait StoreCatalog: Send + Sync {
    /// Active stores of `store_type` within `radius_meters` of `center`,
    /// nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the catalog cannot be queried.
    async fn nearby(
        &self,
        center: Coordinates,
        store_type: StoreType,
        radius_meters: f64,
    ) -> Result<Vec<Store>, DbError>;

    /// The single active store nearest to `center`, regardless of distance.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the catalog cannot be queried.
    async fn nearest_any(&self, center: Coordinates) -> Result<Option<Store>, DbError>;
}

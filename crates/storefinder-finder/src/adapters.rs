//! Production bindings of the ports: HTTP clients and the Postgres catalog.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use storefinder_core::{
    load_catalog, Address, AppConfig, ConfigError, Coordinates, PackageProfile, PostalCode, Store,
    StoreType,
};
use storefinder_db::DbError;
use storefinder_providers::{
    CarrierQuote, DirectionsClient, DrivingRoute, GeocodingClient, MelhorEnvioClient,
    ProviderError, ViaCepClient,
};
use thiserror::Error;

use crate::memory::InMemoryCatalog;
use crate::orchestrator::{FinderPorts, NearestStoreFinder};
use crate::ports::{
    AddressLookup, DirectionsProvider, GeocodingProvider, ShippingRateProvider, StoreCatalog,
};

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    async fn lookup(&self, postal_code: &PostalCode) -> Result<Address, ProviderError> {
        let found = ViaCepClient::lookup(self, postal_code).await?;
        Ok(Address {
            street: found.street,
            district: found.district,
            city: found.city,
            state: found.state,
            postal_code: postal_code.clone(),
        })
    }
}

#[async_trait]
impl GeocodingProvider for GeocodingClient {
    async fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        GeocodingClient::geocode(self, address).await
    }
}

#[async_trait]
impl DirectionsProvider for DirectionsClient {
    async fn driving_route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<DrivingRoute, ProviderError> {
        DirectionsClient::driving_route(self, origin, destination).await
    }
}

#[async_trait]
impl ShippingRateProvider for MelhorEnvioClient {
    async fn quote(
        &self,
        from: &PostalCode,
        to: &PostalCode,
        package: &PackageProfile,
        services: &[String],
    ) -> Result<Vec<CarrierQuote>, ProviderError> {
        self.calculate(from, to, package, services).await
    }
}

/// [`StoreCatalog`] over the PostGIS `stores` table.
#[derive(Debug, Clone)]
pub struct PgStoreCatalog {
    pool: PgPool,
}

impl PgStoreCatalog {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreCatalog for PgStoreCatalog {
    async fn nearby(
        &self,
        center: Coordinates,
        store_type: StoreType,
        radius_meters: f64,
    ) -> Result<Vec<Store>, DbError> {
        storefinder_db::list_nearby_stores(&self.pool, center, store_type, radius_meters).await
    }

    async fn nearest_any(&self, center: Coordinates) -> Result<Option<Store>, DbError> {
        storefinder_db::find_nearest_store(&self.pool, center).await
    }
}

/// Postgres when `DATABASE_URL` is set, otherwise the YAML catalog at
/// `catalog_path` held in memory.
///
/// # Errors
///
/// Returns [`SetupError::Db`] if the pool cannot connect, or
/// [`SetupError::Config`] if the YAML catalog cannot be loaded.
pub async fn catalog_from_config(config: &AppConfig) -> Result<Arc<dyn StoreCatalog>, SetupError> {
    if config.database_url.is_some() {
        let pool = storefinder_db::connect_pool_from_config(config).await?;
        tracing::info!("using postgres store catalog");
        return Ok(Arc::new(PgStoreCatalog::new(pool)));
    }

    let catalog = load_catalog(&config.catalog_path)?;
    let stores = InMemoryCatalog::new(catalog.to_stores());
    tracing::info!(
        path = %config.catalog_path.display(),
        stores = stores.len(),
        "using in-memory store catalog"
    );
    Ok(Arc::new(stores))
}

/// Wire the HTTP clients configured in `config` around `catalog`.
///
/// # Errors
///
/// Returns [`SetupError::Provider`] if an HTTP client cannot be built.
pub fn build_finder(
    config: &AppConfig,
    catalog: Arc<dyn StoreCatalog>,
) -> Result<NearestStoreFinder, SetupError> {
    let timeout = config.http_timeout_secs;
    let user_agent = config.http_user_agent.as_str();
    let google_key = config.google_maps_api_key.as_deref();

    if google_key.is_none() {
        tracing::warn!("GOOGLE_MAPS_API_KEY is not set; geocoding will fail");
    }
    if config.melhor_envio_token.is_none() {
        tracing::warn!("MELHOR_ENVIO_TOKEN is not set; full stores will have no shipping options");
    }

    let ports = FinderPorts {
        address: Arc::new(ViaCepClient::with_base_url(
            &config.viacep_base_url,
            timeout,
            user_agent,
        )?),
        geocoding: Arc::new(GeocodingClient::with_base_url(
            &config.google_maps_base_url,
            google_key,
            timeout,
            user_agent,
        )?),
        catalog,
        directions: Arc::new(DirectionsClient::with_base_url(
            &config.google_maps_base_url,
            google_key,
            timeout,
            user_agent,
        )?),
        shipping: Arc::new(MelhorEnvioClient::with_base_url(
            &config.melhor_envio_base_url,
            config.melhor_envio_token.as_deref(),
            timeout,
            user_agent,
        )?),
    };

    Ok(NearestStoreFinder::new(ports, config.finder.clone()))
}

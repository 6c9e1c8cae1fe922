use std::net::SocketAddr;
use std::path::PathBuf;

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Fixed parcel sent with every carrier rate request.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageProfile {
    pub width_cm: u32,
    pub height_cm: u32,
    pub length_cm: u32,
    pub weight_kg: f64,
    pub insurance_value: Decimal,
}

impl Default for PackageProfile {
    fn default() -> Self {
        Self {
            width_cm: 15,
            height_cm: 10,
            length_cm: 20,
            weight_kg: 1.0,
            insurance_value: Decimal::ZERO,
        }
    }
}

/// Tunables of the nearest-store pipeline, passed to the finder at
/// construction so tests can vary them per case.
#[derive(Debug, Clone, PartialEq)]
pub struct FinderSettings {
    /// Radius of the drop-off and full-store tiers.
    pub search_radius_meters: f64,
    /// Speed used to estimate duration when routing falls back to haversine.
    pub fallback_speed_kmh: f64,
    pub dropoff_fee: Decimal,
    pub dropoff_delivery_days: u32,
    pub dropoff_service_code: String,
    pub dropoff_label: String,
    /// Carrier service codes kept from rate quotes (PAC and SEDEX).
    pub allowed_services: Vec<String>,
    pub package: PackageProfile,
    /// Upper bound on candidates enriched concurrently.
    pub max_concurrent_candidates: usize,
    /// Overall time budget for one lookup, in milliseconds.
    pub request_budget_ms: u64,
}

impl Default for FinderSettings {
    fn default() -> Self {
        Self {
            search_radius_meters: 50_000.0,
            fallback_speed_kmh: 60.0,
            dropoff_fee: Decimal::new(1500, 2),
            dropoff_delivery_days: 1,
            dropoff_service_code: "PDV001".to_string(),
            dropoff_label: "Entrega PDV".to_string(),
            allowed_services: vec!["1".to_string(), "2".to_string()],
            package: PackageProfile::default(),
            max_concurrent_candidates: 4,
            request_budget_ms: 20_000,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub database_url: Option<String>,
    pub catalog_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub viacep_base_url: String,
    pub google_maps_base_url: String,
    pub google_maps_api_key: Option<String>,
    pub melhor_envio_base_url: String,
    pub melhor_envio_token: Option<String>,
    pub http_timeout_secs: u64,
    pub http_user_agent: String,
    pub finder: FinderSettings,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("catalog_path", &self.catalog_path)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("viacep_base_url", &self.viacep_base_url)
            .field("google_maps_base_url", &self.google_maps_base_url)
            .field(
                "google_maps_api_key",
                &self.google_maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("melhor_envio_base_url", &self.melhor_envio_base_url)
            .field(
                "melhor_envio_token",
                &self.melhor_envio_token.as_ref().map(|_| "[redacted]"),
            )
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_user_agent", &self.http_user_agent)
            .field("finder", &self.finder)
            .finish()
    }
}

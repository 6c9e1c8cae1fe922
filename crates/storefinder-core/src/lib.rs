pub mod app_config;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod geo;
pub mod postal;

pub use app_config::{AppConfig, Environment, FinderSettings, PackageProfile};
pub use catalog::{load_catalog, parse_catalog, CatalogFile, StoreEntry};
pub use config::{load_app_config, load_app_config_from_env};
pub use domain::{
    Address, Coordinates, DeliveryEstimate, RouteResult, RouteSource, ShippingOption, Store,
    StoreAddress, StoreCandidate, StoreType,
};
pub use error::{ConfigError, CoreError, EnrichmentFailure, FinderError};
pub use geo::{format_distance, great_circle_km};
pub use postal::PostalCode;

//! Nearest-store lookup: postal code to a ranked list of stores with
//! route and delivery quotes.

pub mod adapters;
pub mod address;
pub mod geocoder;
pub mod memory;
pub mod orchestrator;
pub mod ports;
pub mod proximity;
pub mod route;
pub mod shipping;

pub use adapters::{build_finder, catalog_from_config, PgStoreCatalog, SetupError};
pub use address::AddressResolver;
pub use geocoder::Geocoder;
pub use memory::InMemoryCatalog;
pub use orchestrator::{FinderPorts, NearbyStores, NearestStoreFinder};
pub use ports::{
    AddressLookup, DirectionsProvider, GeocodingProvider, ShippingRateProvider, StoreCatalog,
};
pub use proximity::{ProximityIndex, Tier, TierMatch};
pub use route::RouteCalculator;
pub use shipping::ShippingQuoteResolver;

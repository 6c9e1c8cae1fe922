//! HTTP clients for the external services behind the nearest-store lookup.

pub mod directions;
pub mod error;
pub mod geocoding;
mod http;
pub mod shipping;
pub mod types;
pub mod viacep;

pub use directions::DirectionsClient;
pub use error::ProviderError;
pub use geocoding::GeocodingClient;
pub use shipping::MelhorEnvioClient;
pub use types::{CarrierQuote, DrivingRoute, ViaCepAddress};
pub use viacep::ViaCepClient;

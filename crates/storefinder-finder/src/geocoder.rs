//! Address to coordinates.

use std::sync::Arc;

use storefinder_core::{Address, Coordinates, FinderError};

use crate::ports::GeocodingProvider;

const SERVICE: &str = "geocoding";

pub struct Geocoder {
    provider: Arc<dyn GeocodingProvider>,
}

impl Geocoder {
    #[must_use]
    pub fn new(provider: Arc<dyn GeocodingProvider>) -> Self {
        Self { provider }
    }

    /// Geocodes the free-text form of `address`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::ExternalService`] on zero results, a non-OK
    /// provider status, or out-of-range coordinates.
    pub async fn geocode(&self, address: &Address) -> Result<Coordinates, FinderError> {
        let text = address.geocoding_text();
        if text.is_empty() {
            // Generic city-wide codes can come back with no street parts.
            return self.geocode_text(&address.postal_code.formatted()).await;
        }
        self.geocode_text(&text).await
    }

    /// # Errors
    ///
    /// See [`Geocoder::geocode`].
    pub async fn geocode_text(&self, text: &str) -> Result<Coordinates, FinderError> {
        tracing::debug!(address = text, "geocoding");
        let point = self
            .provider
            .geocode(text)
            .await
            .map_err(|e| external(e.to_string()))?;
        point.validate().map_err(|e| external(e.to_string()))?;
        Ok(point)
    }
}

fn external(message: String) -> FinderError {
    FinderError::ExternalService {
        service: SERVICE,
        message,
    }
}

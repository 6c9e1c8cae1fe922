//! Google Geocoding API client.

use reqwest::{Client, Url};
use storefinder_core::Coordinates;

use crate::error::ProviderError;
use crate::http;
use crate::types::GeocodeResponse;

const SERVICE: &str = "google geocoding";
pub(crate) const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Client for `GET {base}/geocode/json?address=..&key=..`.
///
/// The API key is optional at construction so the rest of the stack can
/// start without it; every call then fails with
/// [`ProviderError::MissingCredentials`] before touching the network.
pub struct GeocodingClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl GeocodingClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, timeout_secs, user_agent)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ProviderError::InvalidBaseUrl`] for a malformed base URL.
    pub fn with_base_url(
        base_url: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_client(timeout_secs, user_agent)?,
            base_url: http::parse_base_url(base_url)?,
            api_key: api_key.map(str::to_owned),
        })
    }

    /// Geocodes free-form address text into the first result's coordinates.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::MissingCredentials`] when no API key is configured.
    /// - [`ProviderError::NoResults`] on `ZERO_RESULTS` or an empty list.
    /// - [`ProviderError::Api`] on any other non-`OK` status.
    /// - [`ProviderError::Http`] / [`ProviderError::Deserialize`] on
    ///   transport or payload failures.
    pub async fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredentials { service: SERVICE })?;

        let mut url = http::join(&self.base_url, "geocode/json")?;
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("region", "br")
            .append_pair("key", api_key);
        tracing::debug!(address, "google geocode");

        let response = self.client.get(url).send().await?;
        let body: GeocodeResponse = http::read_json(response, "geocode").await?;

        match body.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => {
                return Err(ProviderError::NoResults {
                    service: SERVICE,
                    query: address.to_owned(),
                })
            }
            _ => {
                return Err(ProviderError::Api {
                    service: SERVICE,
                    status: body.status,
                    message: body.error_message,
                })
            }
        }

        let location = body
            .results
            .into_iter()
            .next()
            .map(|result| result.geometry.location)
            .ok_or_else(|| ProviderError::NoResults {
                service: SERVICE,
                query: address.to_owned(),
            })?;

        Ok(Coordinates {
            latitude: location.lat,
            longitude: location.lng,
        })
    }
}

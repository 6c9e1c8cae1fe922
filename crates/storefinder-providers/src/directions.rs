//! Google Directions API client (driving mode).

use reqwest::{Client, Url};
use storefinder_core::Coordinates;

use crate::error::ProviderError;
use crate::geocoding::DEFAULT_BASE_URL;
use crate::http;
use crate::types::{DirectionsResponse, DrivingRoute};

const SERVICE: &str = "google directions";

pub struct DirectionsClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl DirectionsClient {
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

    /// Driving distance and duration of the first leg of the first route.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::MissingCredentials`] when no API key is configured.
    /// - [`ProviderError::NoResults`] when Google finds no route.
    /// - [`ProviderError::Api`] on any other non-`OK` status.
    /// - [`ProviderError::Http`] / [`ProviderError::Deserialize`] on
    ///   transport or payload failures.
    pub async fn driving_route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<DrivingRoute, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredentials { service: SERVICE })?;

        let origin_param = lat_lng(origin);
        let destination_param = lat_lng(destination);
        let mut url = http::join(&self.base_url, "directions/json")?;
        url.query_pairs_mut()
            .append_pair("origin", &origin_param)
            .append_pair("destination", &destination_param)
            .append_pair("mode", "driving")
            .append_pair("key", api_key);

        let response = self.client.get(url).send().await?;
        let body: DirectionsResponse = http::read_json(response, "directions").await?;

        let no_route = || ProviderError::NoResults {
            service: SERVICE,
            query: format!("{origin_param} -> {destination_param}"),
        };

        match body.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" | "NOT_FOUND" => return Err(no_route()),
            _ => {
                return Err(ProviderError::Api {
                    service: SERVICE,
                    status: body.status,
                    message: body.error_message,
                })
            }
        }

        let route = body
            .routes
            .into_iter()
            .next()
            .filter(|route| !route.legs.is_empty())
            .ok_or_else(no_route)?;

        Ok(route.legs.iter().fold(
            DrivingRoute {
                distance_meters: 0,
                duration_seconds: 0,
            },
            |total, leg| DrivingRoute {
                distance_meters: total.distance_meters + leg.distance.value,
                duration_seconds: total.duration_seconds + leg.duration.value,
            },
        ))
    }
}

fn lat_lng(point: Coordinates) -> String {
    format!("{},{}", point.latitude, point.longitude)
}

//! ViaCEP postal code lookup.

use reqwest::{Client, StatusCode, Url};
use storefinder_core::PostalCode;

use crate::error::ProviderError;
use crate::http;
use crate::types::{ViaCepAddress, ViaCepResponse};

const SERVICE: &str = "viacep";
const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws";

/// Client for `GET {base}/{cep}/json/`.
///
/// ViaCEP needs no credentials. Use [`ViaCepClient::with_base_url`] to point
/// at a mock server in tests.
pub struct ViaCepClient {
    client: Client,
    base_url: Url,
}

impl ViaCepClient {
    /// Creates a client pointed at the public ViaCEP API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs, user_agent)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ProviderError::InvalidBaseUrl`] for a malformed base URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_client(timeout_secs, user_agent)?,
            base_url: http::parse_base_url(base_url)?,
        })
    }

    /// Resolves a postal code into a structured address.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::NotFound`] when ViaCEP flags the code as unknown
    ///   (`"erro": true`) or answers 404.
    /// - [`ProviderError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`ProviderError::Http`] / [`ProviderError::Deserialize`] on
    ///   transport or payload failures.
    pub async fn lookup(&self, postal_code: &PostalCode) -> Result<ViaCepAddress, ProviderError> {
        let url = http::join(&self.base_url, &format!("{}/json/", postal_code.as_str()))?;
        tracing::debug!(postal_code = %postal_code, "viacep lookup");

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(not_found(postal_code));
        }

        let raw: ViaCepResponse =
            http::read_json(response, &format!("viacep({})", postal_code.as_str())).await?;
        if raw.is_error() {
            return Err(not_found(postal_code));
        }

        Ok(raw.into())
    }
}

fn not_found(postal_code: &PostalCode) -> ProviderError {
    ProviderError::NotFound {
        service: SERVICE,
        resource: format!("CEP {}", postal_code.formatted()),
    }
}

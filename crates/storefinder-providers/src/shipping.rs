//! Melhor Envio shipping rate calculator.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use storefinder_core::{PackageProfile, PostalCode};

use crate::error::ProviderError;
use crate::http;
use crate::types::{CarrierQuote, RawCarrierOption};

const SERVICE: &str = "melhor envio";
const DEFAULT_BASE_URL: &str = "https://sandbox.melhorenvio.com.br/api/v2";

#[derive(Debug, Serialize)]
struct CalculateRequest<'a> {
    from: PostalCodeRef<'a>,
    to: PostalCodeRef<'a>,
    products: [Product; 1],
    options: QuoteOptions,
    /// Comma-separated service ids, e.g. `"1,2"`.
    services: String,
}

#[derive(Debug, Serialize)]
struct PostalCodeRef<'a> {
    postal_code: &'a str,
}

#[derive(Debug, Serialize)]
struct Product {
    id: &'static str,
    width: u32,
    height: u32,
    length: u32,
    weight: f64,
    insurance_value: f64,
    quantity: u32,
}

#[derive(Debug, Serialize)]
struct QuoteOptions {
    receipt: bool,
    own_hand: bool,
    insurance_value: f64,
    reverse: bool,
    non_commercial: bool,
}

impl<'a> CalculateRequest<'a> {
    fn new(
        from: &'a PostalCode,
        to: &'a PostalCode,
        package: &PackageProfile,
        services: &[String],
    ) -> Self {
        let insurance_value = package.insurance_value.to_f64().unwrap_or(0.0);
        Self {
            from: PostalCodeRef {
                postal_code: from.as_str(),
            },
            to: PostalCodeRef {
                postal_code: to.as_str(),
            },
            products: [Product {
                id: "1",
                width: package.width_cm,
                height: package.height_cm,
                length: package.length_cm,
                weight: package.weight_kg,
                insurance_value,
                quantity: 1,
            }],
            options: QuoteOptions {
                receipt: false,
                own_hand: false,
                insurance_value,
                reverse: false,
                non_commercial: true,
            },
            services: services.join(","),
        }
    }
}

/// Client for `POST {base}/me/shipment/calculate`.
pub struct MelhorEnvioClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl MelhorEnvioClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(token: Option<&str>, timeout_secs: u64, user_agent: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(DEFAULT_BASE_URL, token, timeout_secs, user_agent)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ProviderError::InvalidBaseUrl`] for a malformed base URL.
    pub fn with_base_url(
        base_url: &str,
        token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_client(timeout_secs, user_agent)?,
            base_url: http::parse_base_url(base_url)?,
            token: token.map(str::to_owned),
        })
    }

    /// Quotes the given services for one parcel between two postal codes.
    ///
    /// Entries the carrier rejects (an `error` field, or no price) are left
    /// out, so an empty vector is a valid answer.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::MissingCredentials`] when no token is configured.
    /// - [`ProviderError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ProviderError::Http`] / [`ProviderError::Deserialize`] on
    ///   transport or payload failures.
    pub async fn calculate(
        &self,
        from: &PostalCode,
        to: &PostalCode,
        package: &PackageProfile,
        services: &[String],
    ) -> Result<Vec<CarrierQuote>, ProviderError> {
        let token = self
            .token
            .as_deref()
            .ok_or(ProviderError::MissingCredentials { service: SERVICE })?;

        let url = http::join(&self.base_url, "me/shipment/calculate")?;
        let request = CalculateRequest::new(from, to, package, services);
        tracing::debug!(
            from = %from,
            to = %to,
            services = %request.services,
            "melhor envio quote"
        );

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;

        let raw: Vec<RawCarrierOption> = http::read_json(
            response,
            &format!("calculate({} -> {})", from.as_str(), to.as_str()),
        )
        .await?;

        let total = raw.len();
        let quotes: Vec<CarrierQuote> = raw
            .into_iter()
            .filter_map(RawCarrierOption::into_quote)
            .collect();
        if quotes.len() < total {
            tracing::debug!(
                kept = quotes.len(),
                discarded = total - quotes.len(),
                "discarded carrier options without a price"
            );
        }

        Ok(quotes)
    }
}

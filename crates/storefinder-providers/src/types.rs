//! Response shapes of the external services and the values the clients return.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// ViaCEP
// ---------------------------------------------------------------------------

/// Raw ViaCEP payload. Unknown postal codes come back as `{"erro": true}`
/// (older deployments send the string `"true"`).
#[derive(Debug, Deserialize)]
pub(crate) struct ViaCepResponse {
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub complemento: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub localidade: String,
    #[serde(default)]
    pub uf: String,
    #[serde(default)]
    pub erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    pub(crate) fn is_error(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
            Some(_) => true,
            None => false,
        }
    }
}

/// Structured address returned by [`crate::ViaCepClient::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViaCepAddress {
    pub postal_code: String,
    pub street: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
}

impl From<ViaCepResponse> for ViaCepAddress {
    fn from(raw: ViaCepResponse) -> Self {
        Self {
            postal_code: raw.cep,
            street: raw.logradouro,
            complement: raw.complemento,
            district: raw.bairro,
            city: raw.localidade,
            state: raw.uf,
        }
    }
}

// ---------------------------------------------------------------------------
// Google Geocoding / Directions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsRoute {
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsLeg {
    pub distance: TextValue,
    pub duration: TextValue,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TextValue {
    pub value: u64,
}

/// Driving distance and duration of the first route, summed over its legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrivingRoute {
    pub distance_meters: u64,
    pub duration_seconds: u64,
}

// ---------------------------------------------------------------------------
// Melhor Envio
// ---------------------------------------------------------------------------

/// One entry of the `/me/shipment/calculate` response.
///
/// Services the carrier cannot serve for the route come back with an
/// `error` string and no price.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCarrierOption {
    pub id: serde_json::Value,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub custom_price: Option<serde_json::Value>,
    #[serde(default)]
    pub delivery_time: Option<u32>,
    #[serde(default)]
    pub custom_delivery_time: Option<u32>,
    #[serde(default)]
    pub delivery_range: Option<DeliveryRange>,
    #[serde(default)]
    pub company: Option<Company>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct DeliveryRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Company {
    #[serde(default)]
    pub name: String,
}

/// A priced carrier service for one origin/destination pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierQuote {
    pub service_id: String,
    pub name: String,
    pub company: Option<String>,
    pub price: Decimal,
    pub delivery_days: Option<u32>,
    /// `(min, max)` business days when the carrier reports a range.
    pub delivery_range: Option<(u32, u32)>,
}

impl RawCarrierOption {
    /// Converts to a [`CarrierQuote`], or `None` when the entry carries an
    /// error or no usable non-negative price. Custom price and delivery
    /// time win over the list values.
    pub(crate) fn into_quote(self) -> Option<CarrierQuote> {
        if self.error.as_deref().is_some_and(|e| !e.trim().is_empty()) {
            return None;
        }

        let price = self
            .custom_price
            .as_ref()
            .and_then(parse_price)
            .or_else(|| self.price.as_ref().and_then(parse_price))?;
        if price.is_sign_negative() {
            return None;
        }

        let service_id = match &self.id {
            serde_json::Value::String(s) => s.trim().to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => return None,
        };

        Some(CarrierQuote {
            service_id,
            name: self.name,
            company: self
                .company
                .map(|c| c.name)
                .filter(|name| !name.trim().is_empty()),
            price,
            delivery_days: self.custom_delivery_time.or(self.delivery_time),
            delivery_range: self.delivery_range.map(|r| (r.min, r.max)),
        })
    }
}

/// Prices arrive as JSON strings (`"15.58"`) or numbers depending on the
/// endpoint version.
fn parse_price(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::String(s) => Decimal::from_str(s.trim()).ok(),
        serde_json::Value::Number(n) => {
            let raw = n.to_string();
            Decimal::from_str(&raw)
                .or_else(|_| Decimal::from_scientific(&raw))
                .ok()
        }
        _ => None,
    }
}

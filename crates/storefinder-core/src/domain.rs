//! Domain types shared by the catalog, the providers and the finder pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::postal::PostalCode;

/// Store class. Drop-off points deliver locally for a fixed fee; full
/// stores ship through carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreType {
    #[serde(rename = "PDV")]
    DropoffPoint,
    #[serde(rename = "LOJA")]
    FullStore,
}

impl StoreType {
    /// Catalog code (`PDV` / `LOJA`).
    #[must_use]
    pub fn as_code(self) -> &'static str {
        match self {
            StoreType::DropoffPoint => "PDV",
            StoreType::FullStore => "LOJA",
        }
    }
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

impl std::str::FromStr for StoreType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PDV" => Ok(StoreType::DropoffPoint),
            "LOJA" => Ok(StoreType::FullStore),
            other => Err(CoreError::InvalidStoreType(other.to_string())),
        }
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build a checked point.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinates`] when latitude is outside
    /// `[-90, 90]`, longitude outside `[-180, 180]`, or either is not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let point = Self {
            latitude,
            longitude,
        };
        point.validate()?;
        Ok(point)
    }

    /// # Errors
    ///
    /// See [`Coordinates::new`].
    pub fn validate(&self) -> Result<(), CoreError> {
        let reason = if !self.latitude.is_finite() || !self.longitude.is_finite() {
            Some("not a finite number")
        } else if !(-90.0..=90.0).contains(&self.latitude) {
            Some("latitude must be within [-90, 90]")
        } else if !(-180.0..=180.0).contains(&self.longitude) {
            Some("longitude must be within [-180, 180]")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CoreError::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// Postal address of a catalog store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreAddress {
    pub street: String,
    pub number: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

/// A physical store from the catalog. Immutable for the duration of a lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub store_type: StoreType,
    pub address: StoreAddress,
    pub location: Coordinates,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub takeout_in_store: bool,
    pub shipping_time_days: u32,
    pub is_active: bool,
}

/// Address resolved from a postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub street: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: PostalCode,
}

impl Address {
    /// Free-text form handed to the geocoder: non-empty parts of
    /// street, district, city and state joined by `", "`.
    #[must_use]
    pub fn geocoding_text(&self) -> String {
        [&self.street, &self.district, &self.city, &self.state]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Where a [`RouteResult`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    Directions,
    GreatCircle,
}

/// Travel distance and duration between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteResult {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub source: RouteSource,
}

/// Delivery time as a fixed number of business days or a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeliveryEstimate {
    Days { days: u32 },
    Range { min_days: u32, max_days: u32 },
}

impl std::fmt::Display for DeliveryEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryEstimate::Days { days: 1 } => write!(f, "1 business day"),
            DeliveryEstimate::Days { days } => write!(f, "{days} business days"),
            DeliveryEstimate::Range { min_days, max_days } => {
                write!(f, "{min_days}-{max_days} business days")
            }
        }
    }
}

/// A priced delivery option for one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingOption {
    pub service_code: String,
    pub label: String,
    pub carrier: Option<String>,
    pub price: Decimal,
    pub delivery: DeliveryEstimate,
}

/// A ranked store: the unit emitted by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreCandidate {
    pub store: Store,
    pub route: RouteResult,
    pub options: Vec<ShippingOption>,
}

//! YAML store catalog.
//!
//! The catalog file is the source for seeding Postgres and, when no database
//! is configured, for the in-memory proximity index.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinates, Store, StoreAddress, StoreType};
use crate::postal::PostalCode;
use crate::ConfigError;

fn default_country() -> String {
    "Brasil".to_string()
}

fn default_true() -> bool {
    true
}

fn default_shipping_days() -> u32 {
    1
}

/// One store as written in `stores.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEntry {
    /// Stable unique key, e.g. `sp-centro`.
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub store_type: StoreType,
    pub postal_code: String,
    pub street: String,
    #[serde(default)]
    pub number: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
    #[serde(default = "default_country")]
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub takeout_in_store: bool,
    #[serde(default = "default_shipping_days")]
    pub shipping_time_days: u32,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl StoreEntry {
    /// Build the domain [`Store`] with the given catalog identity.
    #[must_use]
    pub fn to_store(&self, id: i64) -> Store {
        Store {
            id,
            code: self.code.clone(),
            name: self.name.clone(),
            store_type: self.store_type,
            address: StoreAddress {
                street: self.street.clone(),
                number: self.number.clone(),
                district: self.district.clone(),
                city: self.city.clone(),
                state: self.state.clone(),
                country: self.country.clone(),
                postal_code: self.postal_code.clone(),
            },
            location: Coordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            phone: self.phone.clone(),
            email: self.email.clone(),
            takeout_in_store: self.takeout_in_store,
            shipping_time_days: self.shipping_time_days,
            is_active: self.active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub stores: Vec<StoreEntry>,
}

impl CatalogFile {
    /// Domain stores with 1-based ids in file order.
    #[must_use]
    pub fn to_stores(&self) -> Vec<Store> {
        self.stores
            .iter()
            .zip(1_i64..)
            .map(|(entry, id)| entry.to_store(id))
            .collect()
    }
}

/// Load and validate the store catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_catalog(&content)
}

/// Parse and validate catalog YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(content: &str) -> Result<CatalogFile, ConfigError> {
    let catalog: CatalogFile = serde_yaml::from_str(content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen_codes = HashSet::new();
    let mut seen_names = HashSet::new();

    for entry in &catalog.stores {
        if entry.code.trim().is_empty() || entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store code and name must be non-empty".to_string(),
            ));
        }

        if !seen_codes.insert(entry.code.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store code: '{}'",
                entry.code
            )));
        }

        if !seen_names.insert(entry.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store name: '{}'",
                entry.name
            )));
        }

        if PostalCode::parse(&entry.postal_code).is_err() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has invalid postal code '{}'",
                entry.code, entry.postal_code
            )));
        }

        if let Err(e) = Coordinates::new(entry.latitude, entry.longitude) {
            return Err(ConfigError::Validation(format!(
                "store '{}': {e}",
                entry.code
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;

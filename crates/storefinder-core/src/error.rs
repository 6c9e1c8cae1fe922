use thiserror::Error;

/// Domain-level validation errors raised while building core types.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinates (lat={latitude}, lng={longitude}): {reason}")]
    InvalidCoordinates {
        latitude: f64,
        longitude: f64,
        reason: &'static str,
    },

    #[error("invalid store type: {0}")]
    InvalidStoreType(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}

/// Request-level failure of a nearest-store lookup.
///
/// Flat taxonomy: callers match on the variant (or on [`FinderError::code`])
/// rather than on a provider-specific error type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FinderError {
    /// Malformed postal code. Raised before any network call.
    #[error("{0}")]
    Validation(String),

    /// Postal code unknown to the address service, empty catalog, or every
    /// candidate dropped during enrichment.
    #[error("{0}")]
    NotFound(String),

    /// Address or geocoding provider failure in the sequential phase.
    #[error("{service} failed: {message}")]
    ExternalService {
        service: &'static str,
        message: String,
    },
}

impl FinderError {
    /// Stable taxonomy code exposed to the HTTP layer.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            FinderError::Validation(_) => "validation_error",
            FinderError::NotFound(_) => "not_found",
            FinderError::ExternalService { .. } => "external_service_error",
        }
    }
}

/// A candidate store that could not be enriched with a route or quote.
///
/// Always recovered locally: the store is dropped from the ranked output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("store {store_id} ({store_name}) dropped: {reason}")]
pub struct EnrichmentFailure {
    pub store_id: i64,
    pub store_name: String,
    pub reason: String,
}

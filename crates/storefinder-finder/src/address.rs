//! Postal code to address resolution.

use std::sync::Arc;

use storefinder_core::{Address, FinderError, PostalCode};

use crate::ports::AddressLookup;

const SERVICE: &str = "address lookup";

pub struct AddressResolver {
    lookup: Arc<dyn AddressLookup>,
}

impl AddressResolver {
    #[must_use]
    pub fn new(lookup: Arc<dyn AddressLookup>) -> Self {
        Self { lookup }
    }

    /// Validates `raw` and resolves it.
    ///
    /// # Errors
    ///
    /// - [`FinderError::Validation`] for a malformed postal code; no call
    ///   is made.
    /// - See [`AddressResolver::resolve_postal_code`].
    pub async fn resolve(&self, raw: &str) -> Result<Address, FinderError> {
        let postal_code = PostalCode::parse(raw)?;
        self.resolve_postal_code(&postal_code).await
    }

    /// # Errors
    ///
    /// - [`FinderError::NotFound`] when the service does not know the code.
    /// - [`FinderError::ExternalService`] for every other failure. There is
    ///   no second address source.
    pub async fn resolve_postal_code(
        &self,
        postal_code: &PostalCode,
    ) -> Result<Address, FinderError> {
        tracing::debug!(postal_code = %postal_code, "resolving address");
        self.lookup.lookup(postal_code).await.map_err(|e| {
            if e.is_not_found() {
                FinderError::NotFound(format!("postal code {postal_code} not found"))
            } else {
                tracing::error!(postal_code = %postal_code, error = %e, "address lookup failed");
                FinderError::ExternalService {
                    service: SERVICE,
                    message: e.to_string(),
                }
            }
        })
    }
}

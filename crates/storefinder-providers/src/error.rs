use thiserror::Error;

/// Errors returned by the external service clients.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    /// The request URL is stripped because query strings carry API keys.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The service answered that the requested resource does not exist.
    #[error("{service}: {resource} not found")]
    NotFound {
        service: &'static str,
        resource: String,
    },

    /// Non-2xx answer. `path` never includes the query string.
    #[error("unexpected HTTP status {status} from {path}")]
    UnexpectedStatus { status: u16, path: String },

    /// The service answered 2xx with a non-OK status field.
    #[error("{service} returned status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Api {
        service: &'static str,
        status: String,
        message: Option<String>,
    },

    #[error("{service} returned no results for {query}")]
    NoResults {
        service: &'static str,
        query: String,
    },

    #[error("{service} credentials are not configured")]
    MissingCredentials { service: &'static str },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Http(e.without_url())
    }
}

impl ProviderError {
    /// `true` when the upstream said the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_message_when_present() {
        let err = ProviderError::Api {
            service: "google geocoding",
            status: "REQUEST_DENIED".to_string(),
            message: Some("The provided API key is invalid.".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "google geocoding returned status REQUEST_DENIED: The provided API key is invalid."
        );
    }

    #[test]
    fn api_error_display_without_message() {
        let err = ProviderError::Api {
            service: "google directions",
            status: "NOT_FOUND".to_string(),
            message: None,
        };
        assert_eq!(err.to_string(), "google directions returned status NOT_FOUND");
    }

    #[test]
    fn only_not_found_reports_is_not_found() {
        assert!(ProviderError::NotFound {
            service: "viacep",
            resource: "CEP 99999999".to_string(),
        }
        .is_not_found());
        assert!(!ProviderError::MissingCredentials {
            service: "melhor envio"
        }
        .is_not_found());
    }
}

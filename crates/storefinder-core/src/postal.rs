//! Brazilian postal code (CEP) normalization.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::FinderError;

static CEP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}-?\d{3}$").expect("valid regex"));

/// An 8-digit postal code, stored without the hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    /// Parse `NNNNNNNN` or `NNNNN-NNN`. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Validation`] for anything else.
    pub fn parse(raw: &str) -> Result<Self, FinderError> {
        let trimmed = raw.trim();
        if !CEP_PATTERN.is_match(trimmed) {
            return Err(FinderError::Validation(format!(
                "invalid postal code \"{raw}\": expected 8 digits (NNNNN-NNN)"
            )));
        }
        Ok(Self(trimmed.replace('-', "")))
    }

    /// The 8 digits, no separator.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form `NNNNN-NNN`.
    #[must_use]
    pub fn formatted(&self) -> String {
        format!("{}-{}", &self.0[..5], &self.0[5..])
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl Serialize for PostalCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.formatted())
    }
}

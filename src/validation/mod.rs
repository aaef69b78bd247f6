//! Inbound parameter validation.
//!
//! # Responsibilities
//! - Reject empty search terms before any upstream call
//! - Parse and range-check HTTP status codes for the image endpoint
//! - Attach a machine code and a user-facing message to every rejection
//!
//! # Design Decisions
//! - Pure functions over their input: no I/O, no logging
//! - Code strictness is a configuration value ([`CodeFormat`]), not a code path per deployment

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lowest status code accepted by the image endpoint.
pub const MIN_HTTP_CODE: u16 = 100;
/// Highest status code accepted by the image endpoint.
pub const MAX_HTTP_CODE: u16 = 599;

/// Reasons an inbound parameter is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Search term missing or whitespace-only.
    #[error("El parámetro 'q' es obligatorio.")]
    EmptyQuery,

    /// Status code is not a (strictly formatted) integer.
    #[error("Código HTTP inválido")]
    InvalidFormat { raw: String },

    /// Status code parsed but falls outside [100, 599].
    #[error("Código HTTP fuera de rango (100-599)")]
    OutOfRange { value: i64 },
}

impl ValidationError {
    /// Stable machine-checkable code for the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyQuery => "emptyQuery",
            ValidationError::InvalidFormat { .. } => "invalidFormat",
            ValidationError::OutOfRange { .. } => "outOfRange",
        }
    }
}

/// A validated, non-empty search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Trim `raw` and reject it when nothing is left.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Same as [`SearchQuery::parse`], treating an absent parameter as empty.
    pub fn from_param(raw: Option<&str>) -> Result<Self, ValidationError> {
        Self::parse(raw.unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How strictly a raw status code string is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeFormat {
    /// Exactly three ASCII digits, nothing else.
    #[default]
    ThreeDigits,
    /// Any integer after trimming whitespace (`"+404"`, `"0200"`).
    Numeric,
}

/// An HTTP status code in [100, 599].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct HttpCode(u16);

impl HttpCode {
    pub fn parse(raw: &str, format: CodeFormat) -> Result<Self, ValidationError> {
        let value = match format {
            CodeFormat::ThreeDigits => {
                if raw.len() != 3 || !raw.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ValidationError::InvalidFormat { raw: raw.to_string() });
                }
                raw.parse::<i64>()
                    .map_err(|_| ValidationError::InvalidFormat { raw: raw.to_string() })?
            }
            CodeFormat::Numeric => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ValidationError::InvalidFormat { raw: raw.to_string() })?,
        };
        Self::try_from(value)
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl TryFrom<i64> for HttpCode {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if !(i64::from(MIN_HTTP_CODE)..=i64::from(MAX_HTTP_CODE)).contains(&value) {
            return Err(ValidationError::OutOfRange { value });
        }
        // Range check above guarantees the value fits.
        Ok(Self(value as u16))
    }
}

impl fmt::Display for HttpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

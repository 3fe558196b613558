//! Error types for adsync-playhead.

use thiserror::Error;

/// Result type for adsync-playhead operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for adsync-playhead operations.
///
/// Only the edges fail: parsing tags and validating configuration. Normalizing
/// and scheduling always produce a value.
#[derive(Debug, Error)]
pub enum Error {
    /// The line is not a well-formed `EXT-X-DATERANGE` tag.
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// A required tag attribute is absent.
    #[error("Missing required attribute: {0}")]
    MissingAttribute(&'static str),

    /// A date attribute is not RFC 3339.
    #[error("Invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create an invalid date range error.
    pub fn invalid_date_range(msg: impl Into<String>) -> Self {
        Self::InvalidDateRange(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

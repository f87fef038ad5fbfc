//! Error types for construction-time contract violations.
//!
//! Rendering never fails: bad frames degrade to empty output. Errors only
//! surface where the host hands over configuration or a time window.

use thiserror::Error;

use crate::view::Timestamp;

/// Errors raised while validating host-supplied inputs.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// The time window does not have a positive span.
    #[error("invalid time window: `to` ({to}) must be greater than `from` ({from})")]
    InvalidWindow {
        /// Window start.
        from: Timestamp,
        /// Window end.
        to: Timestamp,
    },

    /// The path separator is not exactly one character.
    #[error("separator must be exactly one character, got {0:?}")]
    InvalidSeparator(String),

    /// Options or series JSON could not be decoded.
    #[error("malformed panel input: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TopologyError>;

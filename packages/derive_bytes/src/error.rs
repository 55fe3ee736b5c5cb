//! Error handling for password-based byte derivation

use thiserror::Error;

/// Derivation-specific errors
#[derive(Debug, Error)]
pub enum DeriveBytesError {
    /// Missing password, unknown hash algorithm, or an out-of-range parameter
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Parameters were changed after derivation had already started
    #[error("State error: {0}")]
    State(String),

    /// A derivation request asked for fewer than one byte
    #[error("Requested byte count out of range: {requested} (must be at least 1)")]
    Range {
        /// The rejected byte count
        requested: usize,
    },

    /// The hash chain reached the legacy ceiling on block extensions
    #[error("Derivation too long: chain counter reached {counter}")]
    DerivationOverflow {
        /// Chain counter value that hit the ceiling
        counter: u32,
    },

    /// A configuration document could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DeriveBytesError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a state error
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }
}

/// Result type for derivation operations
pub type Result<T> = std::result::Result<T, DeriveBytesError>;

//! Domain error types
//!
//! This module defines the error hierarchy for Lexguard. Configuration problems are
//! fatal at startup, validation problems abort a single call, and everything else
//! the engine encounters is reported as a warning on the call result instead.

use thiserror::Error;

/// Main Lexguard error type
///
/// This is the primary error type used throughout the library. Third-party error
/// types are converted into string payloads so they never leak through the API.
#[derive(Debug, Error)]
pub enum LexguardError {
    /// Unreadable or invalid pattern library, policy, or configuration file
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed input artifact; names the offending field
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    /// The caller's role may not use the requested access tier
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl LexguardError {
    /// Creates a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Process exit code used by the CLI for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 2,
            Self::Validation { .. } => 3,
            Self::Authorization(_) => 4,
            Self::Serialization(_) | Self::Io(_) => 5,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for LexguardError {
    fn from(err: std::io::Error) -> Self {
        LexguardError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LexguardError {
    fn from(err: serde_json::Error) -> Self {
        LexguardError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for LexguardError {
    fn from(err: toml::de::Error) -> Self {
        LexguardError::Configuration(format!("TOML parse error: {err}"))
    }
}

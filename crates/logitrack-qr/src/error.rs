//! Error types for logitrack-qr.
//!
//! This module defines the crate-wide error type. Token decoding has its own
//! single-kind failure, [`DecodeFailure`], which converts into [`Error`] when
//! a caller wants to propagate it with `?`.

use thiserror::Error;

use crate::codec::DecodeFailure;

/// The main error type for logitrack-qr operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Token Errors ===
    /// A token could not be decoded back into a product.
    #[error(transparent)]
    Decode(#[from] DecodeFailure),

    /// The cipher refused to seal a payload.
    #[error("failed to encrypt product token: {message}")]
    Encrypt {
        /// Description of what went wrong.
        message: String,
    },

    // === Scan Errors ===
    /// A scan URL could not be built or parsed.
    #[error("invalid scan URL: {0}")]
    Url(#[from] url::ParseError),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for logitrack-qr operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error is a token decode failure.
    #[must_use]
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeStage;

    #[test]
    fn test_error_display() {
        let err = Error::config_validation("bad window");
        assert_eq!(err.to_string(), "invalid configuration: bad window");
    }

    #[test]
    fn test_decode_failure_is_transparent() {
        let err: Error = DecodeFailure::new(DecodeStage::Decryption).into();
        assert!(err.is_decode_failure());
        assert_eq!(err.to_string(), "could not decode product data");
    }

    #[test]
    fn test_encrypt_error_display() {
        let err = Error::Encrypt {
            message: "aead::Error".to_string(),
        };
        assert!(err.to_string().contains("aead::Error"));
    }

    #[test]
    fn test_from_url_error() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Url(_)));
        assert!(!err.is_decode_failure());
        assert!(err.to_string().starts_with("invalid scan URL"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_figment_error() {
        let err: Error = figment::Error::from("boom".to_string()).into();
        assert!(matches!(err, Error::ConfigLoad(_)));
        assert!(err.to_string().contains("boom"));
    }
}

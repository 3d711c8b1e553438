//! Product token encoding and decoding.
//!
//! [`ProductTokenCodec`] turns a [`ProductToken`] into an opaque URL-safe
//! string and back:
//!
//! 1. serialize the token as compact JSON,
//! 2. seal it with AES-256-GCM-SIV under a passphrase-derived key,
//! 3. frame nonce and ciphertext as `v1.<nonce>.<ciphertext>` in base64url,
//! 4. percent-encode the result.
//!
//! Decoding runs the same steps backwards and validates the JSON shape.
//! Every failure collapses into one [`DecodeFailure`]; the stage that failed
//! is kept for logging only.
//!
//! # Security
//!
//! This is obfuscation, not access control. The passphrase ships with every
//! client that can encode or decode tokens, so anyone inspecting the client
//! can recover it. What the codec does guarantee is that a token decodes only
//! if it was produced under the same key and has not been altered.
//!
//! # Example
//!
//! ```
//! use logitrack_qr::{ProductToken, ProductTokenCodec};
//!
//! let codec = ProductTokenCodec::default();
//! let token = ProductToken::new("Premium Laptop", 120).with_product_type("Electronics");
//!
//! let encoded = codec.encode(&token).unwrap();
//! assert_eq!(codec.decode(&encoded).unwrap(), token);
//! assert!(codec.decode("not-a-valid-token").is_err());
//! ```

mod cipher;
mod envelope;

use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::token::{validate_shape, ProductToken};

pub use cipher::{derive_key, KEY_LEN};
pub use envelope::TOKEN_VERSION;

use cipher::TokenCipher;

/// Passphrase used when none is configured.
pub const DEFAULT_SECRET_KEY: &str = "LogiTrack-QR-Secret-Key-2025";

/// The step of decoding that rejected a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeStage {
    /// The percent-encoding was malformed or decoded to invalid UTF-8.
    PercentDecoding,
    /// The `v1.<nonce>.<ciphertext>` framing was wrong.
    Framing,
    /// The nonce or ciphertext was not valid base64url.
    Base64,
    /// Authentication failed: wrong key or altered token.
    Decryption,
    /// The plaintext was not UTF-8.
    Utf8,
    /// The plaintext was not JSON.
    Json,
    /// The JSON did not look like a product token.
    Shape,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PercentDecoding => write!(f, "percent_decoding"),
            Self::Framing => write!(f, "framing"),
            Self::Base64 => write!(f, "base64"),
            Self::Decryption => write!(f, "decryption"),
            Self::Utf8 => write!(f, "utf8"),
            Self::Json => write!(f, "json"),
            Self::Shape => write!(f, "shape"),
        }
    }
}

/// A token could not be decoded.
///
/// Callers get one failure kind regardless of what went wrong;
/// [`DecodeFailure::stage`] exists for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("could not decode product data")]
pub struct DecodeFailure {
    stage: DecodeStage,
}

impl DecodeFailure {
    /// Create a failure at the given stage.
    #[must_use]
    pub fn new(stage: DecodeStage) -> Self {
        Self { stage }
    }

    /// The stage that rejected the token.
    #[must_use]
    pub fn stage(&self) -> DecodeStage {
        self.stage
    }
}

impl From<DecodeStage> for DecodeFailure {
    fn from(stage: DecodeStage) -> Self {
        Self::new(stage)
    }
}

/// Encrypts product tokens into URL-safe strings and back.
///
/// Holds only the derived key, so it is cheap to clone and safe to share
/// between threads.
#[derive(Debug, Clone)]
pub struct ProductTokenCodec {
    cipher: TokenCipher,
}

impl ProductTokenCodec {
    /// Create a codec keyed with the given passphrase.
    #[must_use]
    pub fn new(passphrase: &str) -> Self {
        Self {
            cipher: TokenCipher::from_passphrase(passphrase),
        }
    }

    /// Create a codec keyed with the configured passphrase.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.codec.secret_key)
    }

    /// Encode a product token.
    ///
    /// The output changes on every call because each token gets a fresh
    /// nonce, but every output decodes to the same token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encrypt`] only if the cipher rejects the payload
    /// length, which product-sized payloads never reach.
    pub fn encode(&self, token: &ProductToken) -> Result<String> {
        let json = serde_json::to_vec(token)?;
        let encoded = self.seal(&json)?;
        debug!(name = %token.name, len = encoded.len(), "Encoded product token");
        Ok(encoded)
    }

    /// Decode a token taken from an untrusted source.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeFailure`] if the token is malformed, was sealed under
    /// another key, was altered, or does not carry a product token.
    pub fn decode(&self, token: &str) -> std::result::Result<ProductToken, DecodeFailure> {
        let result = self.try_decode(token);
        match &result {
            Ok(product) => debug!(name = %product.name, "Decoded product token"),
            Err(failure) => warn!(stage = %failure.stage(), "Could not decode product token"),
        }
        result
    }

    fn try_decode(&self, token: &str) -> std::result::Result<ProductToken, DecodeFailure> {
        let sealed = envelope::unframe(token)?;

        let plaintext = self
            .cipher
            .open(&sealed)
            .map_err(|_| DecodeStage::Decryption)?;
        let text = String::from_utf8(plaintext).map_err(|_| DecodeStage::Utf8)?;
        let value: Value = serde_json::from_str(&text).map_err(|_| DecodeStage::Json)?;

        validate_shape(&value).map_err(|e| {
            debug!(error = %e, "Decoded JSON is not a product token");
            DecodeFailure::new(DecodeStage::Shape)
        })
    }

    /// Seal and frame arbitrary bytes.
    fn seal(&self, plaintext: &[u8]) -> Result<String> {
        let sealed = self.cipher.seal(plaintext).map_err(|e| Error::Encrypt {
            message: e.to_string(),
        })?;
        Ok(envelope::frame(&sealed))
    }
}

impl Default for ProductTokenCodec {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_KEY)
    }
}

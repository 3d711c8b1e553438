//! Scan URLs: what a product QR code points at, and how a scan is read back.
//!
//! A QR code carries a URL of the form
//! `<base_url><scan_path>?<query_param>=<token>`. [`ScanLinkBuilder`] produces
//! it; [`ScanReader`] takes a scanned URL (or the raw parameter value) and
//! turns it into a [`ScanOutcome`] the result view can render directly.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::codec::ProductTokenCodec;
use crate::config::{Config, ScanConfig};
use crate::error::{Error, Result};
use crate::expiry::{ExpiryClassifier, ExpiryStatus};
use crate::token::ProductToken;

/// Whether `name` can be used as the token's query parameter as-is.
///
/// Only RFC 3986 unreserved characters are allowed, so the name never needs
/// escaping and reads back unchanged from the built URL.
#[must_use]
pub fn is_valid_query_param(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'))
}

/// Builds scan URLs for encoded tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanLinkBuilder {
    base: Url,
    scan_path: String,
    query_param: String,
}

impl ScanLinkBuilder {
    /// Create a builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`](crate::Error::Url) if `base_url` does not parse,
    /// or [`Error::ConfigValidation`] if `query_param` is not a plain
    /// parameter name.
    pub fn new(
        base_url: &str,
        scan_path: impl Into<String>,
        query_param: impl Into<String>,
    ) -> Result<Self> {
        let query_param = query_param.into();
        if !is_valid_query_param(&query_param) {
            return Err(Error::config_validation(format!(
                "invalid scan query parameter name: {query_param:?}"
            )));
        }
        Ok(Self {
            base: Url::parse(base_url)?,
            scan_path: scan_path.into(),
            query_param,
        })
    }

    /// Create a builder from the scan section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`](crate::Error::Url) if the base URL does not parse.
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        Self::new(&config.base_url, &config.scan_path, &config.query_param)
    }

    /// Build the scan URL for an already-encoded token.
    #[must_use]
    pub fn build(&self, token: &str) -> Url {
        let mut url = self.base.clone();
        let path = format!("{}{}", self.base.path().trim_end_matches('/'), self.scan_path);
        url.set_path(&path);
        url.set_query(Some(&format!("{}={token}", self.query_param)));
        url.set_fragment(None);
        url
    }

    /// Encode a product and build its scan URL.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn link_for(&self, codec: &ProductTokenCodec, product: &ProductToken) -> Result<Url> {
        let token = codec.encode(product)?;
        Ok(self.build(&token))
    }
}

/// What the scan result view should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// The token decoded into a product.
    Product {
        /// The decoded product.
        product: ProductToken,
        /// Expiry classification at scan time.
        expiry: ExpiryStatus,
    },
    /// The URL carried no token.
    MissingData,
    /// The token could not be decoded.
    Undecodable,
}

impl ScanOutcome {
    /// User-facing error message for failed scans.
    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Product { .. } => None,
            Self::MissingData => Some("No product data found in QR code"),
            Self::Undecodable => Some("Could not decode product data"),
        }
    }

    /// The decoded product, if any.
    #[must_use]
    pub fn product(&self) -> Option<&ProductToken> {
        match self {
            Self::Product { product, .. } => Some(product),
            _ => None,
        }
    }
}

/// Reads scanned URLs back into products.
#[derive(Debug, Clone)]
pub struct ScanReader {
    codec: ProductTokenCodec,
    classifier: ExpiryClassifier,
    query_param: String,
}

impl ScanReader {
    /// Create a reader.
    #[must_use]
    pub fn new(
        codec: ProductTokenCodec,
        classifier: ExpiryClassifier,
        query_param: impl Into<String>,
    ) -> Self {
        Self {
            codec,
            classifier,
            query_param: query_param.into(),
        }
    }

    /// Create a reader from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ProductTokenCodec::from_config(config),
            ExpiryClassifier::from_config(config),
            config.scan.query_param.clone(),
        )
    }

    /// Read a raw token value as taken from the query parameter.
    #[must_use]
    pub fn read_token(&self, token: &str, now: DateTime<Utc>) -> ScanOutcome {
        if token.is_empty() {
            return ScanOutcome::MissingData;
        }

        match self.codec.decode(token) {
            Ok(product) => {
                let expiry = self
                    .classifier
                    .classify(product.expiry_date.as_deref(), now);
                ScanOutcome::Product { product, expiry }
            }
            Err(_) => ScanOutcome::Undecodable,
        }
    }

    /// Read a full scanned URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`](crate::Error::Url) if `scanned` is not a URL.
    /// A URL without the token parameter is not an error; it yields
    /// [`ScanOutcome::MissingData`].
    pub fn read_url(&self, scanned: &str, now: DateTime<Utc>) -> Result<ScanOutcome> {
        let url = Url::parse(scanned)?;
        let token = url
            .query_pairs()
            .find(|(key, _)| key == self.query_param.as_str())
            .map(|(_, value)| value.into_owned());

        let Some(token) = token else {
            debug!(url = %url, param = %self.query_param, "Scanned URL has no token parameter");
            return Ok(ScanOutcome::MissingData);
        };
        Ok(self.read_token(&token, now))
    }
}

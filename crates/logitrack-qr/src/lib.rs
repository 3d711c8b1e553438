//! `logitrack-qr` - Encrypted product QR tokens for LogiTrack
//!
//! This library turns a product's QR-relevant fields into a short encrypted,
//! URL-safe token, builds the scan URL a QR code points at, and reads scanned
//! URLs back into a product plus an expiry banner.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod expiry;
pub mod logging;
pub mod mock;
pub mod scan;
pub mod token;

pub use codec::{DecodeFailure, DecodeStage, ProductTokenCodec};
pub use config::Config;
pub use error::{Error, Result};
pub use expiry::{classify_expiry, ExpiryClassifier, ExpiryState, ExpiryStatus};
pub use logging::init_logging;
pub use scan::{ScanLinkBuilder, ScanOutcome, ScanReader};
pub use token::{validate_shape, CatalogProduct, ProductToken, ShapeError};

//! Configuration management for logitrack-qr.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::codec::DEFAULT_SECRET_KEY;
use crate::error::{Error, Result};
use crate::expiry::DEFAULT_EXPIRING_SOON_DAYS;
use crate::scan::is_valid_query_param;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "logitrack-qr";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "LOGITRACK_QR_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `LOGITRACK_QR_`, sections split on
///    `__`, e.g. `LOGITRACK_QR_CODEC__SECRET_KEY`)
/// 2. TOML config file at `~/.config/logitrack-qr/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Token codec configuration.
    pub codec: CodecConfig,
    /// Scan URL configuration.
    pub scan: ScanConfig,
    /// Expiry banner configuration.
    pub expiry: ExpiryConfig,
}

/// Token codec configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Passphrase the token key is derived from.
    ///
    /// Every client that decodes tokens holds this value, so it does not
    /// keep tokens confidential from someone inspecting the client.
    pub secret_key: String,
}

/// Scan URL configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Origin the scan URL points at.
    pub base_url: String,
    /// Path of the scan result view.
    pub scan_path: String,
    /// Query parameter carrying the token.
    pub query_param: String,
}

/// Expiry banner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpiryConfig {
    /// Days before expiry at which a product counts as expiring soon.
    pub expiring_soon_days: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            scan_path: "/product/scan".to_string(),
            query_param: "data".to_string(),
        }
    }
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            expiring_soon_days: DEFAULT_EXPIRING_SOON_DAYS,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `LOGITRACK_QR_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.codec.secret_key.is_empty() {
            return Err(Error::config_validation("codec.secret_key must not be empty"));
        }

        if self.expiry.expiring_soon_days == 0 {
            return Err(Error::config_validation(
                "expiry.expiring_soon_days must be greater than 0",
            ));
        }

        if let Err(e) = Url::parse(&self.scan.base_url) {
            return Err(Error::config_validation(format!(
                "scan.base_url ({}) is not a valid URL: {e}",
                self.scan.base_url
            )));
        }

        if !self.scan.scan_path.starts_with('/') {
            return Err(Error::config_validation(format!(
                "scan.scan_path ({}) must start with '/'",
                self.scan.scan_path
            )));
        }

        if self.scan.query_param.is_empty() {
            return Err(Error::config_validation("scan.query_param must not be empty"));
        }

        if !is_valid_query_param(&self.scan.query_param) {
            return Err(Error::config_validation(format!(
                "scan.query_param ({}) may only contain letters, digits, '-', '_', '.' and '~'",
                self.scan.query_param
            )));
        }

        Ok(())
    }
}

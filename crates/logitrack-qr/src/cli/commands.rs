//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::token::ProductToken;

/// Encode command arguments.
#[derive(Debug, Args)]
pub struct EncodeCommand {
    /// Product display name
    #[arg(short, long)]
    pub name: String,

    /// Units on hand
    #[arg(long)]
    pub quantity: u64,

    /// Product category
    #[arg(short = 't', long)]
    pub product_type: Option<String>,

    /// Import date (ISO-8601)
    #[arg(long)]
    pub import_date: Option<String>,

    /// Expiry date (ISO-8601)
    #[arg(long)]
    pub expiry_date: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl EncodeCommand {
    /// Build the token described by these arguments.
    #[must_use]
    pub fn to_token(&self) -> ProductToken {
        ProductToken {
            name: self.name.clone(),
            product_type: self.product_type.clone(),
            quantity: self.quantity,
            import_date: self.import_date.clone(),
            expiry_date: self.expiry_date.clone(),
        }
    }
}

/// Decode command arguments.
#[derive(Debug, Args)]
pub struct DecodeCommand {
    /// The token, as found in the scan URL's query parameter
    pub token: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Scan command arguments.
#[derive(Debug, Args)]
pub struct ScanCommand {
    /// The full URL read from a QR code
    pub url: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Mock command arguments.
#[derive(Debug, Args)]
pub struct MockCommand {
    /// Number of products to generate
    #[arg(short = 'n', long, default_value = "3")]
    pub count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

//! Command-line interface for logitrack-qr.
//!
//! This module provides the CLI structure for the `ltqr` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, DecodeCommand, EncodeCommand, MockCommand, ScanCommand};

/// ltqr - Encrypted product QR tokens
///
/// Encode product data into the scan URL printed on a QR label, and read
/// scanned URLs back into product details and expiry status.
#[derive(Debug, Parser)]
#[command(name = "ltqr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode a product into a token and scan URL
    Encode(EncodeCommand),

    /// Decode a token back into product data
    Decode(DecodeCommand),

    /// Read a scanned URL as the scan result view would
    Scan(ScanCommand),

    /// Generate mock products with their scan URLs
    Mock(MockCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

//! `ltqr` - CLI for logitrack-qr
//!
//! This binary encodes products into scan URLs, decodes tokens, reads scanned
//! URLs the way the scan result view does, and prints mock products for QR
//! testing.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use logitrack_qr::cli::{
    Cli, Command, ConfigCommand, DecodeCommand, EncodeCommand, MockCommand, ScanCommand,
};
use logitrack_qr::expiry::{display_date, ExpiryStatus};
use logitrack_qr::{
    init_logging, mock, Config, ExpiryClassifier, ProductToken, ProductTokenCodec,
    ScanLinkBuilder, ScanReader,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // `config validate` reports load errors itself
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        return handle_validate(file.clone().or_else(|| cli.config.clone()));
    }

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Encode(cmd) => handle_encode(&config, &cmd),
        Command::Decode(cmd) => handle_decode(&config, &cmd),
        Command::Scan(cmd) => handle_scan(&config, &cmd),
        Command::Mock(cmd) => handle_mock(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_encode(config: &Config, cmd: &EncodeCommand) -> Result<()> {
    let codec = ProductTokenCodec::from_config(config);
    let links = ScanLinkBuilder::from_config(&config.scan)?;

    let product = cmd.to_token();
    let token = codec.encode(&product)?;
    let url = links.build(&token);

    if cmd.json {
        let output = serde_json::json!({
            "product": product,
            "token": token,
            "url": url.as_str(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Token:    {token}");
        println!("Scan URL: {url}");
    }
    Ok(())
}

fn handle_decode(config: &Config, cmd: &DecodeCommand) -> Result<()> {
    let codec = ProductTokenCodec::from_config(config);
    let product = codec.decode(&cmd.token)?;
    let expiry = ExpiryClassifier::from_config(config)
        .classify(product.expiry_date.as_deref(), Utc::now());

    if cmd.json {
        let output = serde_json::json!({
            "product": product,
            "expiry": expiry,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_product(&product, &expiry);
    }
    Ok(())
}

fn handle_scan(config: &Config, cmd: &ScanCommand) -> Result<()> {
    let reader = ScanReader::from_config(config);
    let outcome = reader.read_url(&cmd.url, Utc::now())?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    match &outcome {
        logitrack_qr::ScanOutcome::Product { product, expiry } => {
            if !cmd.json {
                print_product(product, expiry);
            }
            Ok(())
        }
        failed => bail!(failed.error_message().unwrap_or("Scan failed")),
    }
}

fn handle_mock(config: &Config, cmd: &MockCommand) -> Result<()> {
    let codec = ProductTokenCodec::from_config(config);
    let links = ScanLinkBuilder::from_config(&config.scan)?;
    let classifier = ExpiryClassifier::from_config(config);

    let mut rng: Box<dyn RngCore> = match cmd.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };

    let now = Utc::now();
    let products = mock::generate_mock_products(cmd.count, now, &mut *rng);

    let mut entries = Vec::with_capacity(products.len());
    for product in &products {
        let token = mock::product_to_token(product, now, &mut *rng);
        let url = links.link_for(&codec, &token)?;
        let expiry = classifier.classify(token.expiry_date.as_deref(), now);
        entries.push((product, token, url, expiry));
    }

    if cmd.json {
        let output: Vec<_> = entries
            .iter()
            .map(|(product, _, url, expiry)| {
                serde_json::json!({
                    "product": product,
                    "url": url.as_str(),
                    "expiry": expiry,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (i, (product, token, url, expiry)) in entries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} ({})", product.name, product.sku);
        println!("  Location:    {}", product.location);
        println!("  Status:      {}", product.status);
        println!("  Expiry:      {}", display_date(token.expiry_date.as_deref()));
        println!("  Expiry tag:  {}", expiry.state);
        println!("  Scan URL:    {url}");
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Codec]");
                println!("  Secret key:         {}", mask(&config.codec.secret_key));
                println!();
                println!("[Scan]");
                println!("  Base URL:           {}", config.scan.base_url);
                println!("  Scan path:          {}", config.scan.scan_path);
                println!("  Query parameter:    {}", config.scan.query_param);
                println!();
                println!("[Expiry]");
                println!(
                    "  Expiring soon days: {}",
                    config.expiry.expiring_soon_days
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => return handle_validate(file),
    }
    Ok(())
}

fn handle_validate(file: Option<std::path::PathBuf>) -> Result<()> {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => {
            println!("Configuration is valid.");
            Ok(())
        }
        Err(e) => bail!("Configuration error: {e}"),
    }
}

fn print_product(product: &ProductToken, expiry: &ExpiryStatus) {
    println!("Product:     {}", product.name);
    println!(
        "Type:        {}",
        product.product_type.as_deref().unwrap_or("Not specified")
    );
    println!("Quantity:    {}", product.quantity);
    println!("Imported:    {}", display_date(product.import_date.as_deref()));
    println!("Expires:     {}", display_date(product.expiry_date.as_deref()));
    if let (Some(headline), Some(detail)) = (expiry.headline(), expiry.detail()) {
        println!();
        println!("{headline}: {detail}");
    }
}

/// Show only the first few characters of a secret.
fn mask(secret: &str) -> String {
    let shown: String = secret.chars().take(4).collect();
    format!("{shown}****")
}

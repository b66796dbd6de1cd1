//! Offline catalog query - runs a filter against the catalog file and prints the matches
//!
//! Usage: catalog-query [key=value ...]
//! Keys match the web filter form: search, propertyType, status, bedrooms,
//! bathrooms, location, minPrice, maxPrice, sortBy, market.

use anyhow::{Context, Result};
use realty_catalog::catalog::load::load_catalog;
use realty_catalog::catalog::FilterForm;
use realty_catalog::config::Config;
use std::env;
use tracing::{info, warn};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let catalog = load_catalog(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog from {:?}", config.catalog_path))?;

    let args: Vec<String> = env::args().skip(1).collect();
    let mut pairs = Vec::new();
    for arg in &args {
        match arg.split_once('=') {
            Some((key, value)) => pairs.push((key, value)),
            None => warn!("Ignoring argument without '=': {}", arg),
        }
    }

    let spec = FilterForm::from_pairs(pairs).to_spec();
    let results = catalog.query(&spec);

    println!("{}", serde_json::to_string_pretty(&results)?);

    info!(
        "{} of {} properties matched (sort: {:?})",
        results.len(),
        catalog.len(),
        spec.sort_by
    );

    Ok(())
}

//! Load functions - read the static property collection from disk

use crate::catalog::parse::parse_amount;
use crate::catalog::store::{Catalog, CatalogError};
use crate::catalog::types::{Agent, ListingStatus, LocationType, PropertyRecord, PropertyType};
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Load and validate a catalog, choosing the parser by file extension
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    info!("Loading catalog from {:?}", path);

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    type Parser = fn(&str) -> Result<Vec<PropertyRecord>, CatalogError>;
    let parser: Parser = match extension.as_deref() {
        Some("json") => parse_json_catalog,
        Some("csv") => parse_csv_catalog,
        _ => return Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
    };

    let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Catalog::new(parser(&contents)?)
}

/// JSON array of records - all or nothing
pub fn parse_json_catalog(contents: &str) -> Result<Vec<PropertyRecord>, CatalogError> {
    let records: Vec<PropertyRecord> = serde_json::from_str(contents)?;
    info!("Parsed {} records from JSON catalog", records.len());
    Ok(records)
}

/// Catalog CSV row structure
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogCsvRow {
    id: String,
    title: String,
    location: String,
    location_type: String,
    #[serde(rename = "type")]
    property_type: String,
    status: String,
    price: String,
    bedrooms: String,
    bathrooms: String,
    area: String,
    year_built: Option<String>,
    featured: Option<String>,
    address: Option<String>,
    description: Option<String>,
    images: Option<String>,     // ';'-separated
    amenities: Option<String>,  // ';'-separated
    agent_name: Option<String>,
    agent_phone: Option<String>,
    agent_email: Option<String>,
}

/// CSV catalog - rows that fail to convert are skipped
pub fn parse_csv_catalog(contents: &str) -> Result<Vec<PropertyRecord>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    // An unreadable header row fails the whole file
    reader.headers()?;

    let mut records = Vec::new();
    let mut parse_errors = 0;

    for (idx, result) in reader.deserialize::<CatalogCsvRow>().enumerate() {
        match result {
            Ok(row) => match parse_csv_row(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    parse_errors += 1;
                    if parse_errors <= 10 {
                        // Only log first 10 errors
                        warn!("Failed to parse row {}: {}", idx, e);
                    }
                }
            },
            Err(e) => {
                parse_errors += 1;
                if parse_errors <= 10 {
                    warn!("Failed to deserialize row {}: {}", idx, e);
                }
            }
        }
    }

    info!(
        "Parsed {} records from CSV catalog ({} errors)",
        records.len(),
        parse_errors
    );

    Ok(records)
}

fn parse_csv_row(row: CatalogCsvRow) -> Result<PropertyRecord> {
    let location_type = LocationType::parse(&row.location_type)
        .ok_or_else(|| anyhow!("unknown market {:?}", row.location_type))?;
    let property_type = PropertyType::parse(&row.property_type)
        .ok_or_else(|| anyhow!("unknown property type {:?}", row.property_type))?;
    let status = ListingStatus::parse(&row.status)
        .ok_or_else(|| anyhow!("unknown status {:?}", row.status))?;

    let number = |field: &str, value: &str| {
        parse_amount(value).ok_or_else(|| anyhow!("invalid {} {:?}", field, value))
    };

    let year_built = match non_empty(row.year_built) {
        Some(year) => Some(
            year.parse::<u32>()
                .map_err(|_| anyhow!("invalid year built {:?}", year))?,
        ),
        None => None,
    };

    let featured = non_empty(row.featured)
        .map(|f| matches!(f.to_lowercase().as_str(), "true" | "yes" | "1"))
        .unwrap_or(false);

    let agent = non_empty(row.agent_name).map(|name| Agent {
        name,
        phone: non_empty(row.agent_phone),
        email: non_empty(row.agent_email),
    });

    Ok(PropertyRecord {
        id: row.id,
        title: row.title,
        location: row.location,
        location_type,
        property_type,
        status,
        price: number("price", &row.price)?,
        bedrooms: number("bedrooms", &row.bedrooms)?,
        bathrooms: number("bathrooms", &row.bathrooms)?,
        area: number("area", &row.area)?,
        year_built,
        featured,
        address: non_empty(row.address),
        description: non_empty(row.description),
        images: split_list(row.images),
        amenities: split_list(row.amenities),
        agent,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

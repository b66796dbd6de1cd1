//! In-memory catalog - validated once, read-only afterwards

use crate::catalog::filter::{self, FilterSpec, PriceRange};
use crate::catalog::types::{LocationType, PropertyRecord};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV catalog: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported catalog format: {0:?} (expected .json or .csv)")]
    UnsupportedFormat(PathBuf),

    #[error("duplicate property id: {0}")]
    DuplicateId(String),

    #[error("invalid property {id}: {reason}")]
    InvalidRecord { id: String, reason: String },
}

/// The active property collection with an id index
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<PropertyRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Validate and index a record collection
    pub fn new(records: Vec<PropertyRecord>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            validate_record(record)?;

            if index.insert(record.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
        }

        info!("Catalog ready with {} properties", records.len());

        Ok(Catalog { records, index })
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PropertyRecord> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn query(&self, spec: &FilterSpec) -> Vec<&PropertyRecord> {
        filter::query(&self.records, spec)
    }

    pub fn featured(&self) -> Vec<&PropertyRecord> {
        self.records.iter().filter(|r| r.featured).collect()
    }

    pub fn by_market(&self, market: LocationType) -> Vec<&PropertyRecord> {
        self.records
            .iter()
            .filter(|r| r.location_type == market)
            .collect()
    }

    /// Other listings of the same type, catalog order
    pub fn similar(&self, id: &str, limit: usize) -> Vec<&PropertyRecord> {
        let Some(target) = self.get(id) else {
            return Vec::new();
        };

        self.records
            .iter()
            .filter(|r| r.id != target.id && r.property_type == target.property_type)
            .take(limit)
            .collect()
    }

    /// Distinct location labels in first-seen order
    pub fn locations(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.location.as_str()) {
                seen.push(record.location.as_str());
            }
        }
        seen
    }

    /// Data-derived default for the price slider, `[0, 0]` when empty
    pub fn price_bounds(&self) -> PriceRange {
        PriceRange::spanning(&self.records).unwrap_or(PriceRange { min: 0.0, max: 0.0 })
    }
}

fn validate_record(record: &PropertyRecord) -> Result<(), CatalogError> {
    let invalid = |reason: &str| CatalogError::InvalidRecord {
        id: record.id.clone(),
        reason: reason.to_string(),
    };

    if record.id.trim().is_empty() {
        return Err(invalid("id is empty"));
    }
    if record.title.trim().is_empty() {
        return Err(invalid("title is empty"));
    }
    if !record.price.is_finite() || record.price < 0.0 {
        return Err(invalid("price must be a non-negative number"));
    }
    if !record.area.is_finite() || record.area <= 0.0 {
        return Err(invalid("area must be positive"));
    }
    if !record.bedrooms.is_finite() || record.bedrooms < 0.0 {
        return Err(invalid("bedrooms must be non-negative"));
    }
    if !record.bathrooms.is_finite() || record.bathrooms < 0.0 {
        return Err(invalid("bathrooms must be non-negative"));
    }
    if record.year_built == Some(0) {
        return Err(invalid("year built must be positive"));
    }

    Ok(())
}

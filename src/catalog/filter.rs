//! Filter and sort functions - derive an ordered view of the catalog
//!
//! Everything here is a pure function of its inputs. Filtering is a
//! conjunction of the active criteria and keeps input order; sorting runs
//! afterwards and is stable, so records with equal keys keep their
//! relative order.

use crate::catalog::types::{ListingStatus, LocationType, PropertyRecord, PropertyType};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::debug;

/// Closed price interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    /// Build a range, swapping the bounds if they arrive inverted
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            PriceRange { min, max }
        } else {
            PriceRange { min: max, max: min }
        }
    }

    /// Inclusive on both ends
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }

    /// Smallest range covering every record, `None` when there are none
    pub fn spanning<'a, I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a PropertyRecord>,
    {
        records.into_iter().fold(None, |acc, record| {
            Some(match acc {
                None => PriceRange {
                    min: record.price,
                    max: record.price,
                },
                Some(range) => PriceRange {
                    min: range.min.min(record.price),
                    max: range.max.max(record.price),
                },
            })
        })
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Featured records first, otherwise input order
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    AreaAsc,
    AreaDesc,
    Newest,
    Oldest,
}

impl SortBy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "featured" | "none" => Some(SortBy::Featured),
            "price-asc" => Some(SortBy::PriceAsc),
            "price-desc" => Some(SortBy::PriceDesc),
            "area-asc" => Some(SortBy::AreaAsc),
            "area-desc" => Some(SortBy::AreaDesc),
            "newest" => Some(SortBy::Newest),
            "oldest" => Some(SortBy::Oldest),
            _ => None,
        }
    }
}

/// Active search criteria. `None` means the criterion is inactive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Case-insensitive substring of title, location or type
    pub search: Option<String>,
    pub property_type: Option<PropertyType>,
    pub status: Option<ListingStatus>,
    /// Inclusive lower bound
    pub min_bedrooms: Option<f64>,
    /// Inclusive lower bound
    pub min_bathrooms: Option<f64>,
    /// Exact location label
    pub location: Option<String>,
    pub price_range: Option<PriceRange>,
    pub market: Option<LocationType>,
    pub sort_by: SortBy,
}

impl FilterSpec {
    /// True when no criterion would exclude anything
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_none()
            && self.property_type.is_none()
            && self.status.is_none()
            && self.min_bedrooms.is_none()
            && self.min_bathrooms.is_none()
            && self.location.is_none()
            && self.price_range.is_none()
            && self.market.is_none()
    }
}

/// Whether a single record satisfies every active criterion
pub fn matches(record: &PropertyRecord, spec: &FilterSpec) -> bool {
    let needle = spec.search.as_deref().map(str::to_lowercase);
    matches_with_needle(record, spec, needle.as_deref())
}

fn matches_with_needle(record: &PropertyRecord, spec: &FilterSpec, needle: Option<&str>) -> bool {
    if let Some(needle) = needle {
        let hit = record.title.to_lowercase().contains(needle)
            || record.location.to_lowercase().contains(needle)
            || record.property_type.as_str().contains(needle);
        if !hit {
            return false;
        }
    }

    if spec.property_type.is_some_and(|t| t != record.property_type) {
        return false;
    }

    if spec.status.is_some_and(|s| s != record.status) {
        return false;
    }

    if spec.min_bedrooms.is_some_and(|min| record.bedrooms < min) {
        return false;
    }

    if spec.min_bathrooms.is_some_and(|min| record.bathrooms < min) {
        return false;
    }

    if let Some(location) = &spec.location {
        if *location != record.location {
            return false;
        }
    }

    if spec.price_range.is_some_and(|range| !range.contains(record.price)) {
        return false;
    }

    if spec.market.is_some_and(|m| m != record.location_type) {
        return false;
    }

    true
}

/// Filter then sort. Never fails; an empty result is a normal outcome.
pub fn query<'a, I>(records: I, spec: &FilterSpec) -> Vec<&'a PropertyRecord>
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    let needle = spec.search.as_deref().map(str::to_lowercase);

    let mut results: Vec<&PropertyRecord> = records
        .into_iter()
        .filter(|record| matches_with_needle(record, spec, needle.as_deref()))
        .collect();

    sort_records(&mut results, spec.sort_by);

    debug!(
        "Query matched {} records (sort: {:?})",
        results.len(),
        spec.sort_by
    );

    results
}

/// Stable in-place sort
pub fn sort_records(records: &mut [&PropertyRecord], sort_by: SortBy) {
    match sort_by {
        SortBy::Featured => records.sort_by_key(|r| !r.featured),
        SortBy::PriceAsc => records.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortBy::PriceDesc => records.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortBy::AreaAsc => records.sort_by(|a, b| a.area.total_cmp(&b.area)),
        SortBy::AreaDesc => records.sort_by(|a, b| b.area.total_cmp(&a.area)),
        SortBy::Newest => records.sort_by_key(|r| Reverse(r.year_built_or_zero())),
        SortBy::Oldest => records.sort_by_key(|r| r.year_built_or_zero()),
    }
}

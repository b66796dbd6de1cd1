//! Core data types for the property catalog
//! Pure data structures with no behavior beyond display helpers

use serde::{Deserialize, Serialize};

/// Market a listing belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    India,
    Dubai,
}

impl LocationType {
    pub const ALL: [LocationType; 2] = [LocationType::India, LocationType::Dubai];

    /// Parse a market name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "india" => Some(LocationType::India),
            "dubai" => Some(LocationType::Dubai),
            _ => None,
        }
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationType::India => write!(f, "india"),
            LocationType::Dubai => write!(f, "dubai"),
        }
    }
}

/// Property types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Residential,
    Commercial,
    Vacation,
    Luxury,
}

impl PropertyType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "residential" => Some(PropertyType::Residential),
            "commercial" => Some(PropertyType::Commercial),
            "vacation" => Some(PropertyType::Vacation),
            "luxury" => Some(PropertyType::Luxury),
            _ => None,
        }
    }

    /// Lowercase label, also the text matched by free-text search
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Residential => "residential",
            PropertyType::Commercial => "commercial",
            PropertyType::Vacation => "vacation",
            PropertyType::Luxury => "luxury",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    #[serde(rename = "For Sale")]
    ForSale,
    #[serde(rename = "For Rent")]
    ForRent,
    #[serde(rename = "Sold")]
    Sold,
    #[serde(rename = "Rented")]
    Rented,
}

impl ListingStatus {
    /// Accepts both the display form ("For Sale") and slugs ("for-sale")
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();

        match normalized.as_str() {
            "forsale" => Some(ListingStatus::ForSale),
            "forrent" => Some(ListingStatus::ForRent),
            "sold" => Some(ListingStatus::Sold),
            "rented" => Some(ListingStatus::Rented),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::ForSale => "For Sale",
            ListingStatus::ForRent => "For Rent",
            ListingStatus::Sold => "Sold",
            ListingStatus::Rented => "Rented",
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing agent, carried through untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Property record - read-only once loaded into a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    // Core identification
    pub id: String,
    pub title: String,
    pub location: String,
    pub location_type: LocationType,

    // Listing attributes
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub status: ListingStatus,
    pub price: f64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub area: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<u32>,
    #[serde(default)]
    pub featured: bool,

    // Descriptive fields the engine never inspects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<Agent>,
}

impl PropertyRecord {
    /// Year built with a missing value treated as 0 for ordering
    pub fn year_built_or_zero(&self) -> u32 {
        self.year_built.unwrap_or(0)
    }
}

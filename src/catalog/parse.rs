//! Parse functions - turn raw form input into a FilterSpec
//!
//! Form values arrive as free text (query strings, select boxes, sliders)
//! and are never rejected. Anything that does not parse is treated as the
//! inactive sentinel for that criterion.

use crate::catalog::filter::{FilterSpec, PriceRange, SortBy};
use crate::catalog::types::{ListingStatus, LocationType, PropertyType};
use serde::Deserialize;

/// Raw filter values as a form or query string supplies them
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterForm {
    pub search: Option<String>,
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: Option<String>,
    pub market: Option<String>,
}

impl FilterForm {
    /// Build from `key=value` pairs, ignoring unknown keys
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut form = FilterForm::default();

        for (key, value) in pairs {
            let value = Some(value.to_string());
            match key {
                "search" => form.search = value,
                "propertyType" | "type" => form.property_type = value,
                "status" => form.status = value,
                "bedrooms" => form.bedrooms = value,
                "bathrooms" => form.bathrooms = value,
                "location" => form.location = value,
                "minPrice" => form.min_price = value,
                "maxPrice" => form.max_price = value,
                "sortBy" => form.sort_by = value,
                "market" | "locationType" => form.market = value,
                _ => {}
            }
        }

        form
    }

    /// Never fails - malformed values become inactive criteria
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            property_type: active(self.property_type.as_deref()).and_then(PropertyType::parse),
            status: active(self.status.as_deref()).and_then(ListingStatus::parse),
            min_bedrooms: self.bedrooms.as_deref().and_then(parse_threshold),
            min_bathrooms: self.bathrooms.as_deref().and_then(parse_threshold),
            location: active(self.location.as_deref()).map(str::to_string),
            price_range: parse_price_range(self.min_price.as_deref(), self.max_price.as_deref()),
            market: active(self.market.as_deref()).and_then(LocationType::parse),
            sort_by: self
                .sort_by
                .as_deref()
                .and_then(SortBy::parse)
                .unwrap_or_default(),
        }
    }
}

/// Strip the "all"/"any"/empty sentinels
fn active(value: Option<&str>) -> Option<&str> {
    let value = value?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") || value.eq_ignore_ascii_case("any") {
        None
    } else {
        Some(value)
    }
}

/// Parse a minimum threshold such as "3", "2.5" or "3+"
pub fn parse_threshold(value: &str) -> Option<f64> {
    let value = active(Some(value))?;
    let number = value.strip_suffix('+').unwrap_or(value).trim();
    parse_amount(number)
}

/// Parse a non-negative amount, tolerating currency symbols and separators
pub fn parse_amount(value: &str) -> Option<f64> {
    let clean: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' ' | '$' | '₹'))
        .collect();

    clean
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
}

/// Missing bounds open the range on that side; both missing disables it
fn parse_price_range(min: Option<&str>, max: Option<&str>) -> Option<PriceRange> {
    let min = min.and_then(parse_amount);
    let max = max.and_then(parse_amount);

    match (min, max) {
        (None, None) => None,
        (min, max) => Some(PriceRange::new(
            min.unwrap_or(0.0),
            max.unwrap_or(f64::INFINITY),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("3"), Some(3.0));
        assert_eq!(parse_threshold("2.5"), Some(2.5));
        assert_eq!(parse_threshold("4+"), Some(4.0));
        assert_eq!(parse_threshold("any"), None);
        assert_eq!(parse_threshold(""), None);
        assert_eq!(parse_threshold("three"), None);
        assert_eq!(parse_threshold("-1"), None);
        assert_eq!(parse_threshold("NaN"), None);
    }

    #[test]
    fn test_parse_amount_strips_formatting() {
        assert_eq!(parse_amount("$750,000"), Some(750_000.0));
        assert_eq!(parse_amount("₹ 45,00,000"), Some(4_500_000.0));
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn test_sentinels_are_inactive() {
        let form = FilterForm {
            search: Some("   ".to_string()),
            property_type: Some("all".to_string()),
            status: Some("All".to_string()),
            bedrooms: Some("any".to_string()),
            bathrooms: Some("".to_string()),
            location: Some("all".to_string()),
            market: Some("all".to_string()),
            ..Default::default()
        };

        let spec = form.to_spec();

        assert!(spec.is_unfiltered());
        assert_eq!(spec.sort_by, SortBy::Featured);
    }

    #[test]
    fn test_full_form() {
        let form = FilterForm::from_pairs([
            ("search", " villa "),
            ("propertyType", "luxury"),
            ("status", "For Sale"),
            ("bedrooms", "3"),
            ("bathrooms", "2.5"),
            ("location", "Mumbai"),
            ("minPrice", "1000000"),
            ("maxPrice", "20,000,000"),
            ("sortBy", "price-desc"),
            ("market", "india"),
            ("page", "2"),
        ]);

        let spec = form.to_spec();

        assert_eq!(spec.search.as_deref(), Some("villa"));
        assert_eq!(spec.property_type, Some(PropertyType::Luxury));
        assert_eq!(spec.status, Some(ListingStatus::ForSale));
        assert_eq!(spec.min_bedrooms, Some(3.0));
        assert_eq!(spec.min_bathrooms, Some(2.5));
        assert_eq!(spec.location.as_deref(), Some("Mumbai"));
        assert_eq!(spec.price_range, Some(PriceRange::new(1_000_000.0, 20_000_000.0)));
        assert_eq!(spec.sort_by, SortBy::PriceDesc);
        assert_eq!(spec.market, Some(LocationType::India));
    }

    #[test]
    fn test_unrecognised_values_do_not_filter() {
        let form = FilterForm::from_pairs([
            ("propertyType", "castle"),
            ("bedrooms", "lots"),
            ("sortBy", "random"),
        ]);

        let spec = form.to_spec();

        assert_eq!(spec.property_type, None);
        assert_eq!(spec.min_bedrooms, None);
        assert_eq!(spec.sort_by, SortBy::Featured);
    }

    #[test]
    fn test_price_range_bounds() {
        let only_max = FilterForm::from_pairs([("maxPrice", "500000")]).to_spec();
        assert_eq!(only_max.price_range, Some(PriceRange::new(0.0, 500_000.0)));

        let only_min =
            FilterForm::from_pairs([("minPrice", "500000"), ("maxPrice", "abc")]).to_spec();
        let range = only_min.price_range.unwrap();
        assert_eq!(range.min, 500_000.0);
        assert!(range.max.is_infinite());

        let inverted = FilterForm::from_pairs([("minPrice", "9"), ("maxPrice", "1")]).to_spec();
        assert_eq!(inverted.price_range, Some(PriceRange::new(1.0, 9.0)));

        let neither = FilterForm::from_pairs([("minPrice", "x"), ("maxPrice", "")]).to_spec();
        assert_eq!(neither.price_range, None);
    }
}

//! Property catalog - loading, querying and comparing listings

pub mod compare;
pub mod filter;
pub mod load;
pub mod parse;
pub mod store;
pub mod types;

pub use compare::{ComparisonSet, CompareError, Toggle, COMPARISON_CAPACITY};
pub use filter::{query, FilterSpec, PriceRange, SortBy};
pub use parse::FilterForm;
pub use store::{Catalog, CatalogError};
pub use types::*;

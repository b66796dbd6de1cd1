// Library module for testable functions

pub mod api;
pub mod catalog;
pub mod config;
pub mod loan;

pub use catalog::{query, Catalog, ComparisonSet, FilterSpec};
pub use loan::{estimate, LoanInput, LoanResult};

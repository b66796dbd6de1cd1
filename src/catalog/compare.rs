//! Comparison set - up to three listings held for side-by-side review
//!
//! One instance per user session. The set stores ids only; records are
//! looked up in the catalog when the comparison is rendered.

use crate::catalog::store::Catalog;
use crate::catalog::types::PropertyRecord;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub const COMPARISON_CAPACITY: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    #[error("You can compare up to {capacity} properties at a time")]
    CapacityReached { capacity: usize },
}

/// Outcome of a successful toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    Added,
    Removed,
}

/// Ordered, duplicate-free, capacity-bounded id selection.
///
/// Membership is a linear scan bounded by `COMPARISON_CAPACITY`, so it is
/// constant time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSet {
    ids: Vec<String>,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= COMPARISON_CAPACITY
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Remove if present, otherwise add; a full set rejects new ids unchanged
    pub fn toggle(&mut self, id: &str) -> Result<Toggle, CompareError> {
        if self.remove(id) {
            return Ok(Toggle::Removed);
        }

        if self.is_full() {
            debug!("Comparison set full, rejected {}", id);
            return Err(CompareError::CapacityReached {
                capacity: COMPARISON_CAPACITY,
            });
        }

        self.ids.push(id.to_string());
        Ok(Toggle::Added)
    }

    /// Returns whether anything was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Resolve ids against the catalog in selection order.
    /// Ids with no matching record are purged from the set.
    pub fn resolve<'a>(&mut self, catalog: &'a Catalog) -> Vec<&'a PropertyRecord> {
        self.ids.retain(|id| {
            let live = catalog.contains(id);
            if !live {
                debug!("Purging stale comparison id {}", id);
            }
            live
        });

        self.ids.iter().filter_map(|id| catalog.get(id)).collect()
    }
}

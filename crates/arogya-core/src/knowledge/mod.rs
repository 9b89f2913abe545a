//! Herb knowledge base and remedy storage.
//!
//! The dispatcher only sees remedies through [`RemedySource`], so tests can swap the sled
//! store for an in-memory fake.

mod bootstrap;
mod herbs;
mod remedy;
mod store;

use std::collections::BTreeSet;

use crate::error::StoreError;

pub use bootstrap::{default_remedies, import_remedies_json, seed_default_remedies};
pub use herbs::{HerbRecord, HerbalKnowledge};
pub use remedy::RemedyRecord;
pub use store::RemedyStore;

/// Read-only access to remedy records.
pub trait RemedySource: Send + Sync {
    /// Exact (case-insensitive) lookup by condition name.
    fn find_remedy_by_condition(&self, name: &str) -> Result<Option<RemedyRecord>, StoreError>;

    /// Remedies whose condition name or symptom text contains `needle` (case-insensitive).
    fn search_remedies(&self, needle: &str) -> Result<Vec<RemedyRecord>, StoreError>;

    /// Every herb name referenced by any remedy.
    fn list_distinct_herb_names(&self) -> Result<BTreeSet<String>, StoreError>;
}

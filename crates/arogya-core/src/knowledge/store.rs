//! Sled-backed remedy store: one tree keyed by lowercased condition name, JSON values.

use sled::Db;
use std::collections::BTreeSet;
use std::path::Path;

use super::{RemedyRecord, RemedySource};
use crate::error::StoreError;

const DEFAULT_PATH: &str = "./data/arogya_remedies";
const REMEDY_TREE: &str = "remedies";

/// Persistent remedy records.
pub struct RemedyStore {
    db: Db,
}

impl RemedyStore {
    /// Opens or creates the remedy DB at `./data/arogya_remedies`.
    pub fn new() -> Result<Self, StoreError> {
        Self::open_path(DEFAULT_PATH)
    }

    /// Opens or creates the remedy DB at the given path.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    fn tree(&self) -> Result<sled::Tree, StoreError> {
        Ok(self.db.open_tree(REMEDY_TREE)?)
    }

    /// Inserts or replaces the record for its condition. Returns true if it replaced one.
    pub fn upsert(&self, record: &RemedyRecord) -> Result<bool, StoreError> {
        let key = record.key();
        let prev = self.tree()?.insert(key.as_bytes(), record.to_bytes()?)?;
        let is_update = prev.is_some();
        tracing::info!(
            target: "arogya::remedies",
            condition = %record.condition_name,
            herbs = record.herbs.len(),
            action = if is_update { "UPDATE" } else { "INSERT" },
            "Remedy '{}' {}",
            record.condition_name,
            if is_update { "updated" } else { "inserted" }
        );
        Ok(is_update)
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.tree()?.len())
    }

    /// All records in key order. Undecodable values are skipped with a warning.
    pub fn all(&self) -> Result<Vec<RemedyRecord>, StoreError> {
        let mut out = Vec::new();
        for item in self.tree()?.iter() {
            let (k, v) = item?;
            match RemedyRecord::from_bytes(&v) {
                Ok(rec) => out.push(rec),
                Err(e) => tracing::warn!(
                    target: "arogya::remedies",
                    key = %String::from_utf8_lossy(&k),
                    error = %e,
                    "Skipping undecodable remedy record"
                ),
            }
        }
        Ok(out)
    }

    /// Flushes pending writes to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }
}

impl RemedySource for RemedyStore {
    fn find_remedy_by_condition(&self, name: &str) -> Result<Option<RemedyRecord>, StoreError> {
        let key = name.trim().to_lowercase();
        match self.tree()?.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(RemedyRecord::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    fn search_remedies(&self, needle: &str) -> Result<Vec<RemedyRecord>, StoreError> {
        let needle = needle.to_lowercase();
        Ok(self
            .all()?
            .into_iter()
            .filter(|r| r.mentions(&needle))
            .collect())
    }

    fn list_distinct_herb_names(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(self
            .all()?
            .into_iter()
            .flat_map(|r| r.herbs)
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, RemedyStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RemedyStore::open_path(dir.path().join("remedies")).unwrap();
        (dir, store)
    }

    fn sample() -> RemedyRecord {
        RemedyRecord::new(
            "Joint Pain",
            "stiffness, swelling, aching joints",
            &["Turmeric", "Ashwagandha"],
            "Warm oil massage and gentle movement",
        )
        .with_precautions("Consult a physician for persistent swelling")
    }

    #[test]
    fn upsert_then_find_by_condition_ignores_case() {
        let (_dir, store) = store();
        assert!(!store.upsert(&sample()).unwrap());
        let found = store.find_remedy_by_condition("joint PAIN").unwrap();
        assert_eq!(found, Some(sample()));
        assert!(store.find_remedy_by_condition("Headache").unwrap().is_none());
    }

    #[test]
    fn upsert_replaces_existing_condition() {
        let (_dir, store) = store();
        store.upsert(&sample()).unwrap();
        let mut changed = sample();
        changed.recommendations = "Rest".to_string();
        assert!(store.upsert(&changed).unwrap());
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(
            store.find_remedy_by_condition("Joint Pain").unwrap().unwrap().recommendations,
            "Rest"
        );
    }

    #[test]
    fn search_matches_condition_or_symptoms() {
        let (_dir, store) = store();
        store.upsert(&sample()).unwrap();
        store
            .upsert(&RemedyRecord::new("Insomnia", "difficulty sleeping", &["Brahmi"], "Routine"))
            .unwrap();
        assert_eq!(store.search_remedies("SWELLING").unwrap().len(), 1);
        assert_eq!(store.search_remedies("insom").unwrap()[0].condition_name, "Insomnia");
        assert!(store.search_remedies("fever").unwrap().is_empty());
    }

    #[test]
    fn distinct_herb_names_are_deduplicated() {
        let (_dir, store) = store();
        store.upsert(&sample()).unwrap();
        store
            .upsert(&RemedyRecord::new("Stress", "tension", &["Ashwagandha", "Brahmi"], "Rest"))
            .unwrap();
        let names: Vec<String> = store.list_distinct_herb_names().unwrap().into_iter().collect();
        assert_eq!(names, vec!["Ashwagandha", "Brahmi", "Turmeric"]);
    }
}

//! Runtime config registry.
//!
//! Holds every decoded record in memory, bucketed by record type name and
//! keyed by row id. Resource groups (payload directories) load lazily and
//! at most once; queries come in typed and untyped flavors and share the
//! same id-normalization rules.

use crate::app::models::ConfigRecord;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub mod loader;
pub mod query;

#[cfg(test)]
pub mod tests;

/// In-memory record store, `type name → (id → record)`
#[derive(Default)]
pub struct ConfigRegistry {
    records: HashMap<String, HashMap<String, Box<dyn ConfigRecord>>>,
    loaded_groups: HashSet<String>,
    // Ids already reported as padded, so the trim warning fires once per id
    trim_log: Mutex<HashSet<String>>,
}

impl ConfigRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a decoded record into its type bucket.
    ///
    /// The storage key is the trimmed id; a record replacing an existing one
    /// under the same key returns the replaced record.
    pub fn insert(&mut self, record: Box<dyn ConfigRecord>) -> Option<Box<dyn ConfigRecord>> {
        let type_name = record.type_name().to_string();
        let id = record.id().trim().to_string();
        self.records.entry(type_name).or_default().insert(id, record)
    }

    /// Number of records held for one type
    pub fn type_len(&self, type_name: &str) -> usize {
        self.records.get(type_name).map(HashMap::len).unwrap_or(0)
    }

    /// Total number of records across all types
    pub fn len(&self) -> usize {
        self.records.values().map(HashMap::len).sum()
    }

    /// Whether the registry holds no records
    pub fn is_empty(&self) -> bool {
        self.records.values().all(HashMap::is_empty)
    }

    /// Loaded type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.records.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Distinct padded ids reported so far; one warning fires per entry
    #[cfg(test)]
    pub(crate) fn trim_warning_count(&self) -> usize {
        self.trim_log.lock().map(|log| log.len()).unwrap_or(0)
    }

    /// Drop every record and forget which groups were loaded
    pub fn clear(&mut self) {
        self.records.clear();
        self.loaded_groups.clear();
        if let Ok(mut log) = self.trim_log.lock() {
            log.clear();
        }
    }
}

impl std::fmt::Debug for ConfigRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigRegistry")
            .field("types", &self.type_names())
            .field("records", &self.len())
            .finish()
    }
}

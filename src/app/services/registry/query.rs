//! Typed and untyped registry queries.

use super::ConfigRegistry;
use crate::app::models::{ConfigRecord, StaticRecord};
use tracing::warn;

impl ConfigRegistry {
    /// Trim an incoming id, reporting padded ids once per id and type.
    ///
    /// Authoring tools routinely leave stray whitespace around ids; queries
    /// tolerate it, but the first sighting of each padded id is logged so
    /// the sheet can be fixed.
    pub fn normalize_id<'a>(&self, type_name: &str, id: &'a str) -> &'a str {
        let trimmed = id.trim();
        if trimmed != id {
            if let Ok(mut log) = self.trim_log.lock() {
                let key = format!("{type_name}:{trimmed}");
                if log.insert(key) {
                    warn!(
                        "Id '{id}' for type {type_name} carries surrounding whitespace; \
                         trim it in the source sheet"
                    );
                }
            }
        }
        trimmed
    }

    /// Typed lookup of one record by id
    pub fn get<T: StaticRecord>(&self, id: &str) -> Option<&T> {
        self.get_raw(T::TYPE_NAME, id)
            .and_then(|record| record.as_any().downcast_ref::<T>())
    }

    /// Untyped lookup of one record by type name and id
    pub fn get_raw(&self, type_name: &str, id: &str) -> Option<&dyn ConfigRecord> {
        let id = self.normalize_id(type_name, id);
        let record = self
            .records
            .get(type_name)
            .and_then(|bucket| bucket.get(id))
            .map(Box::as_ref);

        if record.is_none() {
            warn!("No {type_name} record with id '{id}'");
        }
        record
    }

    /// Typed lookup of every record of a type, in unspecified order
    pub fn get_all<T: StaticRecord>(&self) -> Vec<&T> {
        self.get_all_raw(T::TYPE_NAME)
            .into_iter()
            .filter_map(|record| record.as_any().downcast_ref::<T>())
            .collect()
    }

    /// Untyped lookup of every record of a type, in unspecified order
    pub fn get_all_raw(&self, type_name: &str) -> Vec<&dyn ConfigRecord> {
        match self.records.get(type_name) {
            Some(bucket) => bucket.values().map(Box::as_ref).collect(),
            None => {
                warn!("No records loaded for type {type_name}");
                Vec::new()
            }
        }
    }

    /// Whether a record of the given type exists, without logging a miss
    pub fn has<T: StaticRecord>(&self, id: &str) -> bool {
        self.has_raw(T::TYPE_NAME, id)
    }

    /// Untyped existence check, without logging a miss
    pub fn has_raw(&self, type_name: &str, id: &str) -> bool {
        let id = self.normalize_id(type_name, id);
        self.records
            .get(type_name)
            .map(|bucket| bucket.contains_key(id))
            .unwrap_or(false)
    }

    /// Remove one record, or the whole type bucket when `id` is `None`
    pub fn remove<T: StaticRecord>(&mut self, id: Option<&str>) -> usize {
        self.remove_raw(T::TYPE_NAME, id)
    }

    /// Untyped removal, returning how many records were dropped
    pub fn remove_raw(&mut self, type_name: &str, id: Option<&str>) -> usize {
        match id {
            Some(id) => {
                let id = self.normalize_id(type_name, id).to_string();
                self.records
                    .get_mut(type_name)
                    .and_then(|bucket| bucket.remove(&id))
                    .map(|_| 1)
                    .unwrap_or(0)
            }
            None => self
                .records
                .remove(type_name)
                .map(|bucket| bucket.len())
                .unwrap_or(0),
        }
    }
}

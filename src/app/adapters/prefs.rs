//! Persisted integer preferences.
//!
//! A minimal key/value store backing the localization layer's persisted
//! language index. Values live in a small JSON file; writes go through on
//! every change and on explicit flush.

use crate::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default preference file location under the platform config directory
pub fn default_prefs_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("sheetconf").join("prefs.json"))
        .ok_or_else(|| Error::prefs("no platform config directory available"))
}

/// JSON-file backed integer preference store
#[derive(Debug)]
pub struct Prefs {
    path: PathBuf,
    values: HashMap<String, i64>,
}

impl Prefs {
    /// Open a preference store, reading existing values if the file exists.
    ///
    /// A corrupt preference file is not fatal: it is logged and treated as
    /// empty, so a bad write can never brick language selection.
    pub fn open(path: &Path) -> Self {
        let values = match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(values) => values,
                Err(e) => {
                    warn!("Ignoring corrupt preference file {}: {e}", path.display());
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self {
            path: path.to_path_buf(),
            values,
        }
    }

    /// Read an integer preference, falling back to a default
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    /// Write an integer preference and persist immediately
    pub fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    /// Persist the current values to disk
    pub fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("creating {}", parent.display()), e))?;
        }
        let text = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, text)
            .map_err(|e| Error::io(format!("writing {}", self.path.display()), e))?;
        debug!("Flushed preferences to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");

        let mut prefs = Prefs::open(&path);
        assert_eq!(prefs.get_int("CURRENT_LANGUAGE_INDEX", 0), 0);

        prefs.set_int("CURRENT_LANGUAGE_INDEX", 1).unwrap();

        let reopened = Prefs::open(&path);
        assert_eq!(reopened.get_int("CURRENT_LANGUAGE_INDEX", 0), 1);
    }

    #[test]
    fn test_corrupt_file_is_treated_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        std::fs::write(&path, b"not json").unwrap();

        let prefs = Prefs::open(&path);
        assert_eq!(prefs.get_int("CURRENT_LANGUAGE_INDEX", 0), 0);
    }

    #[test]
    fn test_flush_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/prefs.json");

        let mut prefs = Prefs::open(&path);
        prefs.set_int("k", 7).unwrap();
        assert!(path.exists());
    }
}

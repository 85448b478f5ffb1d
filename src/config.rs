//! Configuration management and validation.
//!
//! Provides the pipeline path configuration (workbook directory, generated
//! type output, payload output, preference file), loadable from a TOML file
//! and layered under CLI argument overrides.

use crate::constants::{DEFAULT_PAYLOAD_DIR, DEFAULT_TYPES_DIR, DEFAULT_WORKBOOK_DIR};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Pipeline configuration for sheetconf
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory scanned for workbook files (`.xlsx`/`.xls`)
    pub workbook_dir: PathBuf,

    /// Directory receiving generated record-type definitions
    pub types_dir: PathBuf,

    /// Directory receiving compiled JSON payload files
    pub payload_dir: PathBuf,

    /// Preference file holding the persisted language index.
    /// `None` selects the platform default location.
    pub prefs_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workbook_dir: PathBuf::from(DEFAULT_WORKBOOK_DIR),
            types_dir: PathBuf::from(DEFAULT_TYPES_DIR),
            payload_dir: PathBuf::from(DEFAULT_PAYLOAD_DIR),
            prefs_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading config file {}", path.display()), e))?;
        let config: Config = toml::from_str(&text)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load the config file if one was given, otherwise start from defaults,
    /// then apply any CLI path overrides on top.
    pub fn load_layered(
        config_file: Option<&Path>,
        workbook_dir: Option<PathBuf>,
        types_dir: Option<PathBuf>,
        payload_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(dir) = workbook_dir {
            config.workbook_dir = dir;
        }
        if let Some(dir) = types_dir {
            config.types_dir = dir;
        }
        if let Some(dir) = payload_dir {
            config.payload_dir = dir;
        }

        Ok(config)
    }

    /// Set a custom preference file location
    pub fn with_prefs_path(mut self, path: PathBuf) -> Self {
        self.prefs_path = Some(path);
        self
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.workbook_dir.exists() {
            return Err(Error::configuration(format!(
                "Workbook directory does not exist: {}",
                self.workbook_dir.display()
            )));
        }

        if !self.workbook_dir.is_dir() {
            return Err(Error::configuration(format!(
                "Workbook path is not a directory: {}",
                self.workbook_dir.display()
            )));
        }

        if self.types_dir == self.payload_dir {
            return Err(Error::configuration(
                "Type output and payload output directories must differ".to_string(),
            ));
        }

        Ok(())
    }
}

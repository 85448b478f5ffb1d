//! Lazy payload-group loading.

use super::ConfigRegistry;
use crate::app::adapters::filesystem;
use crate::app::services::decoders::DecoderRegistry;
use crate::constants::TYPE_TAG;
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info, warn};

impl ConfigRegistry {
    /// Load a resource group directory if it has not been loaded yet.
    ///
    /// Idempotent per directory: a second call for the same group is a
    /// no-op, so call sites can guard every query with it.
    pub fn ensure_loaded(&mut self, group_dir: &Path, decoders: &DecoderRegistry) -> Result<()> {
        let key = group_dir.display().to_string();
        if self.loaded_groups.contains(&key) {
            debug!("Resource group {key} already loaded");
            return Ok(());
        }

        self.load_group(group_dir, decoders)?;
        self.loaded_groups.insert(key);
        Ok(())
    }

    /// Load every payload file of a resource group.
    ///
    /// A payload file that fails to read or parse is logged and skipped so
    /// one bad artifact cannot take down the whole group.
    pub fn load_group(&mut self, group_dir: &Path, decoders: &DecoderRegistry) -> Result<()> {
        let files = filesystem::payload_files(group_dir)?;
        let mut loaded = 0usize;

        for file in &files {
            match self.load_payload_file(file, decoders) {
                Ok(count) => loaded += count,
                Err(e) => warn!("Skipping payload {}: {e}", file.display()),
            }
        }

        info!(
            "Loaded {loaded} record(s) from {} payload file(s) in {}",
            files.len(),
            group_dir.display()
        );
        Ok(())
    }

    /// Load one payload file, returning how many records were inserted.
    ///
    /// The fallback type name comes from the payload file name (the part
    /// before the first underscore); records carrying a `$type` member use
    /// that instead. Records that fail to decode are skipped with a warning.
    pub fn load_payload_file(
        &mut self,
        file: &Path,
        decoders: &DecoderRegistry,
    ) -> Result<usize> {
        let text = std::fs::read_to_string(file)
            .map_err(|e| Error::io(format!("reading payload {}", file.display()), e))?;
        let payload: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&text)?;

        let file_type = file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let file_type = file_type.split('_').next().unwrap_or(&file_type).to_string();

        let mut inserted = 0usize;
        for (key, value) in &payload {
            let type_name = value
                .get(TYPE_TAG)
                .and_then(serde_json::Value::as_str)
                .unwrap_or(&file_type);

            match decoders.decode(type_name, value) {
                Ok(record) => {
                    if record.id().trim().is_empty() {
                        warn!(
                            "Record '{key}' in {} has an empty id, skipping",
                            file.display()
                        );
                        continue;
                    }
                    if self.insert(record).is_some() {
                        warn!(
                            "Record '{key}' in {} replaced an already-loaded record",
                            file.display()
                        );
                    }
                    inserted += 1;
                }
                Err(e) => warn!(
                    "Record '{key}' in {} failed to decode, skipping: {e}",
                    file.display()
                ),
            }
        }

        debug!("Loaded {inserted} record(s) from {}", file.display());
        Ok(inserted)
    }
}

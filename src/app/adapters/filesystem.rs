//! Filesystem helpers for the pipeline's output and load paths.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Create a directory (and parents) if it does not exist
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::io(format!("creating directory {}", dir.display()), e))?;
        debug!("Created directory {}", dir.display());
    }
    Ok(())
}

/// Delete a directory's stale contents and recreate it empty.
///
/// Payload output is regenerated in full on every compile run.
pub fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .map_err(|e| Error::io(format!("clearing directory {}", dir.display()), e))?;
    }
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::io(format!("creating directory {}", dir.display()), e))?;
    debug!("Reset directory {}", dir.display());
    Ok(())
}

/// Write a text file as UTF-8 without a byte-order mark.
///
/// Generated artifacts must not carry a BOM so that regeneration never
/// introduces invisible diffs.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text.as_bytes())
        .map_err(|e| Error::io(format!("writing {}", path.display()), e))
}

/// List every `.json` payload file under a resource group directory, sorted.
pub fn payload_files(group_dir: &Path) -> Result<Vec<PathBuf>> {
    if !group_dir.is_dir() {
        return Err(Error::registry(format!(
            "resource group directory does not exist: {}",
            group_dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(group_dir) {
        let entry = entry?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .map(|e| e.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

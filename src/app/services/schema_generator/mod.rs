//! Record-type generation from scanned table plans.
//!
//! Stage one of the pipeline: for every source workbook, emit one Rust
//! record-type definition derived from its header rows. Generation is
//! idempotent per file within a run (a workbook's second sheet does not
//! regenerate) and never overwrites an existing definition, so hand edits
//! to generated types survive regeneration.

use crate::app::adapters::filesystem;
use crate::app::models::TablePlan;
use crate::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod codegen;

#[cfg(test)]
pub mod tests;

/// Result of generating one table plan's record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Definition written to the given path
    Written(PathBuf),

    /// Another sheet of the same workbook already generated this type
    /// earlier in the run
    AlreadyGenerated,

    /// A definition file already exists on disk and was kept as authored
    AlreadyAuthored(PathBuf),
}

/// Generates record-type definition files, tracking per-run idempotence
#[derive(Debug)]
pub struct SchemaGenerator {
    out_dir: PathBuf,
    generated: HashSet<String>,
}

impl SchemaGenerator {
    /// Create a generator writing into the given output directory
    pub fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
            generated: HashSet::new(),
        }
    }

    /// Generate the record-type definition for one table plan.
    ///
    /// Creates the output directory if absent. The type is keyed by the
    /// source workbook, so only the first sheet of a file triggers
    /// generation; an existing definition file is left untouched.
    pub fn generate(&mut self, plan: &TablePlan) -> Result<GenerateOutcome> {
        if !self.generated.insert(plan.type_name.clone()) {
            return Ok(GenerateOutcome::AlreadyGenerated);
        }

        filesystem::ensure_dir(&self.out_dir)?;

        let path = self.out_dir.join(format!("{}.rs", plan.type_name));
        if path.exists() {
            warn!(
                "Type definition already authored, keeping existing file: {}",
                path.display()
            );
            return Ok(GenerateOutcome::AlreadyAuthored(path));
        }

        let source = codegen::render_record_type(plan);
        filesystem::write_text(&path, &source)?;
        info!("Generated record type {} at {}", plan.type_name, path.display());

        Ok(GenerateOutcome::Written(path))
    }

    /// Type names generated (or skipped as authored) so far this run
    pub fn generated_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generated.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

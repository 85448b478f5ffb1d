//! The `generate` command: workbook headers to record-type definitions.

use super::RunStats;
use crate::app::services::schema_generator::{GenerateOutcome, SchemaGenerator};
use crate::app::services::workbook;
use crate::config::Config;
use crate::Result;
use tracing::info;

/// Scan every workbook and generate missing record-type definitions.
///
/// Existing definition files are left untouched; once generated, a type
/// belongs to the host project and may carry hand edits.
pub fn run(config: &Config) -> Result<RunStats> {
    let plans = workbook::scan_tables(&config.workbook_dir)?;
    info!(
        "Scanned {} sheet(s) in {}",
        plans.len(),
        config.workbook_dir.display()
    );

    let mut generator = SchemaGenerator::new(&config.types_dir);
    let mut stats = RunStats {
        tables_scanned: plans.len(),
        ..Default::default()
    };

    for plan in &plans {
        if let GenerateOutcome::Written(path) = generator.generate(plan)? {
            info!("Generated {}", path.display());
            stats.files_written += 1;
        }
    }

    info!(
        "Generation complete: {} definition(s) written, rebuild the host before compiling rows",
        stats.files_written
    );
    Ok(stats)
}

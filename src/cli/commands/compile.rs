//! The `compile` command: data rows to JSON payload files.

use super::RunStats;
use crate::app::services::decoders::DecoderRegistry;
use crate::app::services::row_compiler::RowCompiler;
use crate::app::services::workbook;
use crate::config::Config;
use crate::Result;
use tracing::{error, info};

/// Compile every sheet's data rows into payload files.
///
/// The CLI has no generated types linked in, so every scanned type gets a
/// schema-less decoder; rows are still shape-checked (object with a
/// non-empty string id). A table that fails wholesale is reported and the
/// remaining tables still compile.
pub fn run(config: &Config) -> Result<RunStats> {
    let plans = workbook::scan_tables(&config.workbook_dir)?;
    info!(
        "Scanned {} sheet(s) in {}",
        plans.len(),
        config.workbook_dir.display()
    );

    let mut decoders = DecoderRegistry::new();
    for plan in &plans {
        if !decoders.contains(&plan.type_name) {
            decoders.register_dynamic(&plan.type_name);
        }
    }

    let compiler = RowCompiler::new(&config.payload_dir);
    compiler.prepare_output_dir()?;

    let mut stats = RunStats {
        tables_scanned: plans.len(),
        ..Default::default()
    };

    for plan in &plans {
        match compiler.compile_table(plan, &decoders) {
            Ok(output) => {
                stats.files_written += 1;
                stats.rows_written += output.rows_written;
                stats.rows_skipped += output.rows_skipped;
            }
            Err(e) => {
                error!(
                    "Sheet '{}' of {} failed to compile: {e}",
                    plan.sheet_name,
                    plan.source_file.display()
                );
                stats.errors_encountered += 1;
            }
        }
    }

    info!(
        "Compilation complete: {} payload(s), {} record(s)",
        stats.files_written, stats.rows_written
    );
    Ok(stats)
}

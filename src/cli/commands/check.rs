//! The `check` command: scan and report without writing anything.

use super::RunStats;
use crate::app::services::workbook;
use crate::config::Config;
use crate::Result;
use colored::Colorize;

/// Scan every workbook, validate headers, and report the planned outputs.
///
/// Header violations surface as errors exactly as they would during
/// generation; nothing is written. Useful before committing sheet edits.
pub fn run(config: &Config) -> Result<RunStats> {
    let plans = workbook::scan_tables(&config.workbook_dir)?;

    println!(
        "{} sheet(s) in {}:",
        plans.len(),
        config.workbook_dir.display()
    );

    for plan in &plans {
        let type_file = config.types_dir.join(format!("{}.rs", plan.type_name));
        let type_status = if type_file.exists() {
            "type exists".green()
        } else {
            "type missing, run generate".yellow()
        };

        println!(
            "  {} '{}' ({} column(s)) -> {} [{}]",
            plan.type_name.bold(),
            plan.sheet_name,
            plan.columns.len(),
            plan.payload_file_name(),
            type_status
        );
    }

    Ok(RunStats {
        tables_scanned: plans.len(),
        ..Default::default()
    })
}

//! Row-to-data compilation.
//!
//! Stage two of the pipeline: re-reads each planned sheet's data rows,
//! coerces every cell per its column's declared type, validates the
//! assembled JSON object through the registered decoder for the sheet's
//! record type, and writes one payload file per sheet. Failures isolate at
//! the row: a bad row is skipped with a warning and its siblings proceed.

use crate::app::adapters::filesystem;
use crate::app::models::TablePlan;
use crate::app::services::decoders::DecoderRegistry;
use crate::app::services::workbook;
use crate::constants::{FIRST_DATA_ROW, TYPE_TAG};
use crate::{Error, Result};
use calamine::Data;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod coerce;

#[cfg(test)]
pub mod tests;

/// Compiled records of one sheet, keyed by row id
#[derive(Debug, Default)]
pub struct CompiledSheet {
    /// Row id → assembled record value (includes the `$type` discriminator)
    pub records: BTreeMap<String, serde_json::Value>,

    /// Rows dropped for an empty id or a failed decode
    pub rows_skipped: usize,
}

/// Result of compiling and writing one sheet
#[derive(Debug)]
pub struct SheetOutput {
    /// Payload file the sheet was written to
    pub payload_path: PathBuf,

    /// Number of records written
    pub rows_written: usize,

    /// Number of rows skipped
    pub rows_skipped: usize,
}

/// Compiles planned sheets into JSON payload files
#[derive(Debug)]
pub struct RowCompiler {
    out_dir: PathBuf,
}

impl RowCompiler {
    /// Create a compiler writing payloads into the given directory
    pub fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
        }
    }

    /// Clear stale payloads and recreate the output directory.
    ///
    /// Called once per run before any sheet compiles; payloads are always
    /// regenerated in full.
    pub fn prepare_output_dir(&self) -> Result<()> {
        filesystem::reset_dir(&self.out_dir)
    }

    /// Compile one planned sheet from its workbook and write its payload
    pub fn compile_table(
        &self,
        plan: &TablePlan,
        decoders: &DecoderRegistry,
    ) -> Result<SheetOutput> {
        let rows = workbook::sheet_rows(plan)?;
        let compiled = compile_rows(plan, &rows, decoders)?;
        let payload_path = self.write_payload(plan, &compiled)?;

        info!(
            "Payload {} written with {} record(s) ({} row(s) skipped)",
            payload_path.display(),
            compiled.records.len(),
            compiled.rows_skipped
        );

        Ok(SheetOutput {
            payload_path,
            rows_written: compiled.records.len(),
            rows_skipped: compiled.rows_skipped,
        })
    }

    /// Serialize a compiled sheet to its payload file (UTF-8, no BOM)
    pub fn write_payload(&self, plan: &TablePlan, compiled: &CompiledSheet) -> Result<PathBuf> {
        filesystem::ensure_dir(&self.out_dir)?;
        let path = self.out_dir.join(plan.payload_file_name());
        let json = serde_json::to_string_pretty(&compiled.records)?;
        filesystem::write_text(&path, &json)?;
        Ok(path)
    }
}

/// Compile a sheet's data rows into id-keyed record values.
///
/// The sheet's record type must resolve to a registered decoder; that is
/// fatal for the table because compilation only runs after generated types
/// have been built into the host. Individual rows that fail to decode are
/// skipped with a warning.
pub fn compile_rows(
    plan: &TablePlan,
    rows: &[Vec<Data>],
    decoders: &DecoderRegistry,
) -> Result<CompiledSheet> {
    if !decoders.contains(&plan.type_name) {
        return Err(Error::type_resolution(
            &plan.type_name,
            format!(
                "cannot compile sheet '{}': no decoder for its record type; \
                 did you regenerate the types and rebuild?",
                plan.sheet_name
            ),
        ));
    }

    let mut compiled = CompiledSheet::default();

    for (offset, row) in rows.iter().enumerate() {
        // 1-based sheet row for diagnostics, counting the header rows
        let row_number = FIRST_DATA_ROW + offset + 1;

        let id = row.first().map(workbook::cell_text).unwrap_or_default();
        if id.trim().is_empty() {
            warn!(
                "Row {} of sheet '{}' has an empty id, skipping",
                row_number, plan.sheet_name
            );
            compiled.rows_skipped += 1;
            continue;
        }

        let json_text = assemble_row_json(plan, row, row_number);
        let value: serde_json::Value = match serde_json::from_str(&json_text) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "Row {} (id '{}') of sheet '{}' produced invalid JSON, skipping: {e}",
                    row_number, id, plan.sheet_name
                );
                compiled.rows_skipped += 1;
                continue;
            }
        };

        let record = match decoders.decode(&plan.type_name, &value) {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    "Row {} (id '{}') of sheet '{}' failed to decode, skipping: {e}",
                    row_number, id, plan.sheet_name
                );
                compiled.rows_skipped += 1;
                continue;
            }
        };

        if record.id().trim().is_empty() {
            warn!(
                "Row {} of sheet '{}' decoded with an empty id, skipping",
                row_number, plan.sheet_name
            );
            compiled.rows_skipped += 1;
            continue;
        }

        // Last write wins on duplicates, but the collision is surfaced
        if compiled.records.insert(id.clone(), value).is_some() {
            warn!(
                "Duplicate id '{}' in sheet '{}' at row {}; later row overwrites the earlier one",
                id, plan.sheet_name, row_number
            );
        }
    }

    Ok(compiled)
}

/// Assemble one row into JSON object text, `$type` member first.
///
/// Cells are stringified (formula cells via their cached result), empty
/// values substitute `"0"` for non-string types, and each member renders
/// per its column's declared type. The id member is always a JSON string
/// whatever its column declares, since ids key the payload map and the
/// record contract.
fn assemble_row_json(plan: &TablePlan, row: &[Data], row_number: usize) -> String {
    let mut members = Vec::with_capacity(plan.columns.len() + 1);
    members.push(format!(
        "{}:{}",
        coerce::quote_json(TYPE_TAG),
        coerce::quote_json(&plan.type_name)
    ));

    let max_columns = row.len().min(plan.columns.len());
    for col in 0..max_columns {
        let field = &plan.columns[col];
        let mut text = workbook::cell_text(&row[col]);

        if text.is_empty() {
            if !field.keeps_empty() {
                text = "0".to_string();
            }
            warn!(
                "Empty value in sheet '{}' row {} column {} (field '{}')",
                plan.sheet_name,
                row_number,
                col + 1,
                field.name
            );
        }

        let rendered = if field.is_id() {
            coerce::quote_json(&text)
        } else {
            coerce::render_value(field, &text)
        };
        members.push(format!("{}:{rendered}", coerce::quote_json(&field.name)));
    }

    format!("{{{}}}", members.join(","))
}

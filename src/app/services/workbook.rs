//! Workbook discovery and sheet scanning.
//!
//! Handles the spreadsheet side of the pipeline: finding workbook files,
//! reading the three header rows of every sheet into [`FieldSpec`]s, and
//! re-reading data rows for compilation. Formula cells come back from
//! calamine as their cached results, which is exactly what the pipeline
//! wants.

use crate::app::models::{FieldSpec, TablePlan};
use crate::constants::{
    DEFAULT_SHEET_NAME, FIRST_DATA_ROW, HEADER_COMMENT_ROW, HEADER_NAME_ROW, HEADER_TYPE_ROW,
    ID_FIELD, TEMP_FILE_MARKER, TYPE_NAME_SUFFIX, WORKBOOK_EXTENSIONS,
};
use crate::{Error, Result};
use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::{Path, PathBuf};
use tracing::debug;

/// List the workbook files in a directory.
///
/// Files whose extension is not `.xlsx`/`.xls` and editor lock files
/// (`~$Name.xlsx`) are skipped. An empty result is a hard error: a run over
/// nothing is always a misconfiguration.
pub fn discover_workbooks(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::io(format!("reading workbook directory {}", dir.display()), e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            !name.starts_with(TEMP_FILE_MARKER) && WORKBOOK_EXTENSIONS.contains(&ext.as_str())
        })
        .collect();

    if files.is_empty() {
        return Err(Error::EmptyTableDir {
            path: dir.to_path_buf(),
        });
    }

    // Deterministic processing order
    files.sort();

    debug!("Discovered {} workbook file(s) in {}", files.len(), dir.display());
    Ok(files)
}

/// Scan every sheet of every workbook in a directory into table plans.
///
/// Each plan carries the record type name (derived from the file stem), the
/// payload name (type name plus sanitized sheet name) and the ordered column
/// descriptors. A sheet whose first column is not `id` fails the run.
pub fn scan_tables(dir: &Path) -> Result<Vec<TablePlan>> {
    let files = discover_workbooks(dir)?;
    let mut plans = Vec::new();

    for file in &files {
        let stem = file_stem(file)?;
        let type_name = format!("{stem}{TYPE_NAME_SUFFIX}");

        let mut workbook = open_workbook_auto(file)
            .map_err(|e| Error::workbook(file.display().to_string(), "failed to open", Some(e)))?;

        for sheet_name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                Error::workbook(
                    file.display().to_string(),
                    format!("failed to read sheet '{sheet_name}'"),
                    Some(e),
                )
            })?;

            let columns = header_fields(&range, file, &sheet_name)?;
            let payload_name = format!("{}_{}", type_name, sanitize_sheet_name(&sheet_name));

            plans.push(TablePlan {
                type_name: type_name.clone(),
                payload_name,
                columns,
                source_file: file.clone(),
                sheet_name,
            });
        }
    }

    Ok(plans)
}

/// Re-read the data rows of a planned sheet (rows 3 and onward).
///
/// The compile stage re-reads the workbook rather than holding sheet data
/// across the external recompilation boundary. Rows are addressed by
/// absolute sheet coordinates: calamine's used range can start below row 0
/// when leading cells are blank, and the header layout is positional.
pub fn sheet_rows(plan: &TablePlan) -> Result<Vec<Vec<Data>>> {
    let file = &plan.source_file;
    let mut workbook = open_workbook_auto(file)
        .map_err(|e| Error::workbook(file.display().to_string(), "failed to open", Some(e)))?;

    let range = workbook.worksheet_range(&plan.sheet_name).map_err(|e| {
        Error::workbook(
            file.display().to_string(),
            format!("failed to read sheet '{}'", plan.sheet_name),
            Some(e),
        )
    })?;

    let Some(end) = range.end() else {
        return Ok(Vec::new());
    };

    let width = end.1 as usize + 1;
    let mut rows = Vec::new();
    for row in FIRST_DATA_ROW..=(end.0 as usize) {
        let cells = (0..width)
            .map(|col| {
                range
                    .get_value((row as u32, col as u32))
                    .cloned()
                    .unwrap_or(Data::Empty)
            })
            .collect();
        rows.push(cells);
    }
    Ok(rows)
}

/// Stringify a cell the way the row compiler sees it.
///
/// Floats that carry no fractional part print as integers, matching how
/// spreadsheet tools display them; error cells and empties become empty
/// text.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Clean a sheet name into a safe identifier/file-name fragment.
///
/// First character is forced to a letter or underscore, the rest are
/// restricted to letters/digits/underscore, runs of underscores collapse,
/// a trailing underscore is trimmed, and an empty result falls back to the
/// default sheet name.
pub fn sanitize_sheet_name(sheet_name: &str) -> String {
    if sheet_name.is_empty() {
        return DEFAULT_SHEET_NAME.to_string();
    }

    let mut out = String::with_capacity(sheet_name.len());
    for (i, c) in sheet_name.chars().enumerate() {
        let keep = if i == 0 {
            c.is_alphabetic() || c == '_'
        } else {
            c.is_alphanumeric() || c == '_'
        };
        out.push(if keep { c } else { '_' });
    }

    while out.contains("__") {
        out = out.replace("__", "_");
    }
    let out = out.trim_end_matches('_');

    if out.is_empty() {
        DEFAULT_SHEET_NAME.to_string()
    } else {
        out.to_string()
    }
}

/// Workbook file stem, used to derive the record type name
fn file_stem(file: &Path) -> Result<String> {
    file.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| {
            Error::workbook(
                file.display().to_string(),
                "workbook file has no usable file stem",
                None,
            )
        })
}

/// Read the three header rows into ordered column descriptors.
///
/// Column reading stops at the first column with an empty name or type.
/// The first column's field name must be literally `id`.
fn header_fields(range: &Range<Data>, file: &Path, sheet_name: &str) -> Result<Vec<FieldSpec>> {
    // Absolute sheet coordinates throughout: an all-blank comment row is
    // legal authoring and shifts calamine's used range down a row
    let rows_present = range.end().map(|(row, _)| row as usize + 1).unwrap_or(0);
    if rows_present < FIRST_DATA_ROW {
        return Err(Error::sheet_format(
            file.display().to_string(),
            sheet_name,
            format!(
                "expected {FIRST_DATA_ROW} header rows (comment, field name, type), found {rows_present}"
            ),
        ));
    }

    let text_at = |row: usize, col: usize| -> String {
        range
            .get_value((row as u32, col as u32))
            .map(cell_text)
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    let id_cell = text_at(HEADER_NAME_ROW, 0);
    if id_cell != ID_FIELD {
        return Err(Error::sheet_format(
            file.display().to_string(),
            sheet_name,
            format!("first column must be named '{ID_FIELD}', found '{id_cell}'"),
        ));
    }

    let width = range.end().map(|(_, col)| col as usize + 1).unwrap_or(0);
    let mut columns = Vec::new();
    for col in 0..width {
        let name = text_at(HEADER_NAME_ROW, col);
        let declared_type = text_at(HEADER_TYPE_ROW, col);
        if name.is_empty() || declared_type.is_empty() {
            break;
        }

        columns.push(FieldSpec {
            name,
            declared_type,
            comment: text_at(HEADER_COMMENT_ROW, col),
        });
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_sheet_name() {
        let result = sanitize_sheet_name("Level 1!!");
        assert_eq!(result, "Level_1");

        // Properties the sanitizer must hold for any input
        assert!(result.chars().next().map(|c| c.is_alphabetic() || c == '_').unwrap_or(false));
        assert!(result.chars().all(|c| c.is_alphanumeric() || c == '_'));
        assert!(!result.contains("__"));
        assert!(!result.ends_with('_'));
    }

    #[test]
    fn test_sanitize_forces_leading_letter() {
        assert_eq!(sanitize_sheet_name("1Level"), "_1Level");
        assert_eq!(sanitize_sheet_name("_ok"), "_ok");
    }

    #[test]
    fn test_sanitize_empty_and_degenerate() {
        assert_eq!(sanitize_sheet_name(""), DEFAULT_SHEET_NAME);
        assert_eq!(sanitize_sheet_name("!!!"), DEFAULT_SHEET_NAME);
    }

    #[test]
    fn test_sanitize_collapses_underscores() {
        assert_eq!(sanitize_sheet_name("a - b"), "a_b");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("Sword".to_string())), "Sword");
        assert_eq!(cell_text(&Data::Float(1.0)), "1");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Int(42)), "42");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
    }

    #[test]
    fn test_blank_comment_row_does_not_shift_header_reads() {
        // Nothing in row 0, so the used range starts at the name row
        let mut range: Range<Data> = Range::new((1, 0), (3, 1));
        range.set_value((1, 0), Data::String("id".to_string()));
        range.set_value((1, 1), Data::String("name".to_string()));
        range.set_value((2, 0), Data::String("string".to_string()));
        range.set_value((2, 1), Data::String("string".to_string()));
        range.set_value((3, 0), Data::String("r1".to_string()));
        range.set_value((3, 1), Data::String("Sword".to_string()));

        let columns = header_fields(&range, Path::new("Items.xlsx"), "Sheet1").unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "id");
        assert_eq!(columns[1].name, "name");
        assert!(columns[0].comment.is_empty());
    }

    #[test]
    fn test_header_row_count_uses_absolute_rows() {
        // Only a name row: two absolute rows present, header incomplete
        let mut range: Range<Data> = Range::new((1, 0), (1, 0));
        range.set_value((1, 0), Data::String("id".to_string()));

        let result = header_fields(&range, Path::new("Items.xlsx"), "Sheet1");
        assert!(matches!(result, Err(Error::SheetFormat { .. })));
    }

    #[test]
    fn test_discover_rejects_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        let result = discover_workbooks(temp_dir.path());
        assert!(matches!(result, Err(Error::EmptyTableDir { .. })));
    }

    #[test]
    fn test_discover_filters_temp_and_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("Items.xlsx"), b"stub").unwrap();
        std::fs::write(temp_dir.path().join("~$Items.xlsx"), b"lock").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), b"text").unwrap();

        let files = discover_workbooks(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Items.xlsx"));
    }
}

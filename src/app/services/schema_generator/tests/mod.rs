//! Tests for record-type generation


use crate::app::models::{FieldSpec, TablePlan};
use std::path::PathBuf;

/// Build a table plan without touching the filesystem
pub fn test_plan(type_name: &str, sheet: &str, columns: Vec<FieldSpec>) -> TablePlan {
    TablePlan {
        type_name: type_name.to_string(),
        payload_name: format!("{type_name}_{sheet}"),
        columns,
        source_file: PathBuf::from(format!(
            "{}.xlsx",
            type_name.strip_suffix("Config").unwrap_or(type_name)
        )),
        sheet_name: sheet.to_string(),
    }
}

/// Column descriptor shorthand
pub fn field(name: &str, declared_type: &str, comment: &str) -> FieldSpec {
    FieldSpec {
        name: name.to_string(),
        declared_type: declared_type.to_string(),
        comment: comment.to_string(),
    }
}

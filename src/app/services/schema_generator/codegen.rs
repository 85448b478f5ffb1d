//! Rust source rendering for generated record types.

use crate::app::models::TablePlan;
use crate::constants::ID_FIELD;
use tracing::warn;

/// Map a declared spreadsheet type token to its Rust storage type.
///
/// Returns `None` for tokens the pipeline does not recognize.
pub fn rust_type(token: &str) -> Option<String> {
    if let Some(element) = token.strip_suffix("[]") {
        return rust_type(element).map(|inner| format!("Vec<{inner}>"));
    }

    let mapped = match token {
        "int" => "i32",
        "long" => "i64",
        "float" => "f32",
        "double" => "f64",
        "bool" => "bool",
        "string" => "String",
        _ => return None,
    };
    Some(mapped.to_string())
}

/// Render the complete generated source file for one record type.
///
/// The struct carries the id field first, then every non-id column in
/// declared order with its comment as documentation, plus the record
/// contract impls and a decoder registration helper.
pub fn render_record_type(plan: &TablePlan) -> String {
    let type_name = &plan.type_name;
    let source_name = plan
        .source_file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| plan.type_name.clone());

    let mut out = String::new();
    out.push_str(&format!(
        "// Generated by sheetconf from {source_name}.\n\
         // This file is only written when absent; hand edits are preserved.\n\n"
    ));
    out.push_str("use serde::{Deserialize, Serialize};\n");
    out.push_str("use sheetconf::app::models::{ConfigRecord, StaticRecord};\n");
    out.push_str("use sheetconf::app::services::decoders::DecoderRegistry;\n\n");

    out.push_str("#[allow(non_snake_case)]\n");
    out.push_str("#[derive(Debug, Clone, Serialize, Deserialize)]\n");
    out.push_str(&format!("pub struct {type_name} {{\n"));
    out.push_str("    /// Row identifier.\n");
    out.push_str(&format!("    pub {ID_FIELD}: String,\n"));

    for column in &plan.columns {
        if column.is_id() {
            continue;
        }

        let storage = rust_type(&column.declared_type).unwrap_or_else(|| {
            warn!(
                "Unknown declared type '{}' for field '{}' in {}; storing as String",
                column.declared_type, column.name, type_name
            );
            "String".to_string()
        });

        if !column.comment.is_empty() {
            out.push_str(&format!("    /// {}\n", column.comment));
        }
        out.push_str(&format!("    pub {}: {},\n", column.name, storage));
    }
    out.push_str("}\n\n");

    out.push_str(&format!(
        "impl ConfigRecord for {type_name} {{\n\
         \x20   fn id(&self) -> &str {{\n\
         \x20       &self.id\n\
         \x20   }}\n\n\
         \x20   fn type_name(&self) -> &str {{\n\
         \x20       Self::TYPE_NAME\n\
         \x20   }}\n\n\
         \x20   fn as_any(&self) -> &dyn std::any::Any {{\n\
         \x20       self\n\
         \x20   }}\n\
         }}\n\n"
    ));

    out.push_str(&format!(
        "impl StaticRecord for {type_name} {{\n\
         \x20   const TYPE_NAME: &'static str = \"{type_name}\";\n\
         }}\n\n"
    ));

    out.push_str(&format!(
        "/// Register this record type's decoder.\n\
         pub fn register(registry: &mut DecoderRegistry) {{\n\
         \x20   registry.register::<{type_name}>();\n\
         }}\n"
    ));

    out
}

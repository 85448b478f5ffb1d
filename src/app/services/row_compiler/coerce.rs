//! Cell-text to JSON member rendering.
//!
//! Pure text transforms: given a cell's stringified value and its column's
//! declared type, produce the JSON fragment for that member. Numeric and
//! boolean columns emit bare JSON scalars so decoding stays strict; string
//! columns are escaped and quoted.

use crate::app::models::FieldSpec;
use crate::app::services::csv_array;

/// Render a cell value as the JSON fragment for its field.
///
/// Empty-cell substitution has already happened by the time this runs, so
/// the text is exactly what the member should carry.
pub fn render_value(field: &FieldSpec, text: &str) -> String {
    if field.is_bool() {
        return coerce_bool(text).to_string();
    }

    if field.is_array() {
        if field.is_string_array() {
            let quoted: Vec<String> = csv_array::parse(text)
                .iter()
                .map(|element| quote_json(element))
                .collect();
            return format!("[{}]", quoted.join(","));
        }
        // Numeric arrays are authored as bare comma-separated literals
        return format!("[{text}]");
    }

    if field.is_numeric_scalar() {
        return text.to_string();
    }

    quote_json(text)
}

/// Coerce loose boolean spellings to a JSON boolean literal.
///
/// `true`/`false` in any casing pass through; anything else is truthy
/// except the literal `0`, which covers the empty-cell substitution.
pub fn coerce_bool(text: &str) -> &'static str {
    match text.to_lowercase().as_str() {
        "true" => "true",
        "false" | "0" => "false",
        _ => "true",
    }
}

/// Escape and quote text as a JSON string literal
pub fn quote_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

//! Core data model for the pipeline and the runtime registry.
//!
//! Defines the column/table descriptors produced by workbook scanning, the
//! record contract every compiled config type implements, and the built-in
//! record types shipped with the crate.

use crate::constants::{ID_FIELD, TYPE_TAG};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::path::PathBuf;

/// One spreadsheet column, derived from the three header rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name (header row 1)
    pub name: String,

    /// Declared type token, e.g. `int`, `string`, `string[]` (header row 2)
    pub declared_type: String,

    /// Free-form comment (header row 0), becomes the field's documentation
    pub comment: String,
}

impl FieldSpec {
    /// Whether this is the mandatory id column
    pub fn is_id(&self) -> bool {
        self.name == ID_FIELD
    }

    /// Whether the declared type is boolean
    pub fn is_bool(&self) -> bool {
        self.declared_type == "bool"
    }

    /// Whether the declared type is an array type (`T[]`)
    pub fn is_array(&self) -> bool {
        self.declared_type.ends_with("[]")
    }

    /// Whether the declared type is the string-array type
    pub fn is_string_array(&self) -> bool {
        self.declared_type == "string[]"
    }

    /// Whether the declared type is a bare numeric scalar
    pub fn is_numeric_scalar(&self) -> bool {
        matches!(self.declared_type.as_str(), "int" | "long" | "float" | "double")
    }

    /// String-typed columns keep empty cells empty; every other type
    /// substitutes `"0"` for an empty cell.
    pub fn keeps_empty(&self) -> bool {
        self.declared_type == "string" || self.declared_type == "string[]"
    }
}

/// One sheet of one workbook, planned for generation and compilation
#[derive(Debug, Clone)]
pub struct TablePlan {
    /// Record type name, `<FileStem>Config`; shared by all sheets of a file
    pub type_name: String,

    /// Payload base name, `<type_name>_<sanitized sheet name>`
    pub payload_name: String,

    /// Ordered column descriptors, id column first
    pub columns: Vec<FieldSpec>,

    /// Workbook file this sheet came from
    pub source_file: PathBuf,

    /// Original (unsanitized) sheet name
    pub sheet_name: String,
}

impl TablePlan {
    /// File name of the payload this sheet compiles to
    pub fn payload_file_name(&self) -> String {
        format!("{}.json", self.payload_name)
    }
}

/// Contract implemented by every compiled config record.
///
/// Generated record types implement this (plus [`StaticRecord`]); the
/// registry stores records behind this trait and hands them back typed via
/// downcasting.
pub trait ConfigRecord: Any + std::fmt::Debug + Send + Sync {
    /// The record's row identifier
    fn id(&self) -> &str;

    /// The record's type name as it appears in payload discriminators
    fn type_name(&self) -> &str;

    /// Upcast for typed retrieval
    fn as_any(&self) -> &dyn Any;
}

/// Statically-named record types, required for typed registry queries.
///
/// Acts as the "inherits the base record contract" check of the query API:
/// a type that does not implement this cannot be queried, at compile time.
pub trait StaticRecord: ConfigRecord + Sized {
    /// Type name used as the registry bucket key and payload discriminator
    const TYPE_NAME: &'static str;
}

/// Schema-less record used when no generated type is linked in, e.g. by the
/// CLI compiling payloads outside the game host. Carries the raw JSON
/// members alongside the id.
#[derive(Debug, Clone)]
pub struct DynRecord {
    type_name: String,
    id: String,
    fields: serde_json::Map<String, serde_json::Value>,
}

impl DynRecord {
    /// Decode a payload record into a dynamic record.
    ///
    /// The value must be a JSON object with a non-empty string `id` member.
    pub fn from_value(type_name: &str, value: &serde_json::Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::decode(type_name, "record is not a JSON object"))?;

        let id = object
            .get(ID_FIELD)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| Error::decode(type_name, "record has no string 'id' member"))?;

        if id.trim().is_empty() {
            return Err(Error::decode(type_name, "record id is empty"));
        }

        let mut fields = object.clone();
        fields.remove(TYPE_TAG);

        Ok(Self {
            type_name: type_name.to_string(),
            id: id.to_string(),
            fields,
        })
    }

    /// Raw field access by name
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }

    /// String field access by name
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(serde_json::Value::as_str)
    }
}

impl ConfigRecord for DynRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Localization table record: one translated text per row.
///
/// The id is the text key; `lang_key` selects the language bucket. This is
/// the one record type the crate ships itself, because the localization
/// layer depends on its shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagesConfig {
    /// Text key
    pub id: String,

    /// Language key, e.g. `cn` or `en`
    #[serde(rename = "langKey")]
    pub lang_key: String,

    /// Translated text
    pub text: String,
}

impl ConfigRecord for LanguagesConfig {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl StaticRecord for LanguagesConfig {
    const TYPE_NAME: &'static str = crate::constants::LANGUAGES_TYPE_NAME;
}

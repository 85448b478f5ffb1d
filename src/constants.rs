//! Constants shared across the pipeline stages and the runtime registry.

/// Workbook file extensions recognized by discovery (lowercase, no dot)
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// Prefix of editor lock/temp files that discovery must ignore
pub const TEMP_FILE_MARKER: &str = "~$";

/// Header row holding the per-column comment text
pub const HEADER_COMMENT_ROW: usize = 0;

/// Header row holding the field names
pub const HEADER_NAME_ROW: usize = 1;

/// Header row holding the declared field types
pub const HEADER_TYPE_ROW: usize = 2;

/// First data row of every sheet
pub const FIRST_DATA_ROW: usize = 3;

/// Mandatory name of the first column of every sheet
pub const ID_FIELD: &str = "id";

/// Suffix appended to a workbook's file stem to form its record type name
pub const TYPE_NAME_SUFFIX: &str = "Config";

/// JSON member carrying the record type discriminator in payload files
pub const TYPE_TAG: &str = "$type";

/// Fallback name for sheets whose sanitized name comes out empty
pub const DEFAULT_SHEET_NAME: &str = "Sheet";

/// Record type name of the localization table
pub const LANGUAGES_TYPE_NAME: &str = "LanguagesConfig";

/// Preference key persisting the active language index
pub const LANGUAGE_INDEX_KEY: &str = "CURRENT_LANGUAGE_INDEX";

/// Default directory scanned for workbook files
pub const DEFAULT_WORKBOOK_DIR: &str = "assets/tables";

/// Default directory receiving generated record-type definitions
pub const DEFAULT_TYPES_DIR: &str = "src/generated";

/// Default directory receiving compiled JSON payloads
pub const DEFAULT_PAYLOAD_DIR: &str = "assets/configs";

//! Sheetconf Library
//!
//! A Rust library for compiling spreadsheet-authored game balance tables
//! into strongly-typed records and JSON payload files, plus a runtime
//! registry that serves the compiled records to game code.
//!
//! This library provides tools for:
//! - Reading workbook files (`.xlsx`/`.xls`) with three-row header metadata
//! - Generating one Rust record-type definition per source workbook
//! - Coercing data rows per declared column type into JSON payloads
//! - Loading payloads into an in-memory, type-keyed and id-keyed registry
//! - A localization layer with persisted language selection
//! - Comprehensive error handling with row/sheet/file failure isolation

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod csv_array;
        pub mod decoders;
        pub mod localization;
        pub mod registry;
        pub mod row_compiler;
        pub mod schema_generator;
        pub mod workbook;
    }
    pub mod adapters {
        pub mod filesystem;
        pub mod prefs;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{ConfigRecord, FieldSpec, StaticRecord, TablePlan};
pub use app::services::decoders::DecoderRegistry;
pub use app::services::localization::{Language, LocaleStore};
pub use app::services::registry::ConfigRegistry;
pub use config::Config;

/// Result type alias for the sheetconf pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for pipeline and registry operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Workbook could not be opened or read
    #[error("Workbook error in file '{file}': {message}")]
    Workbook {
        file: String,
        message: String,
        #[source]
        source: Option<calamine::Error>,
    },

    /// Sheet violates the expected header layout
    #[error("Sheet format error in '{file}' sheet '{sheet}': {message}")]
    SheetFormat {
        file: String,
        sheet: String,
        message: String,
    },

    /// No decoder is registered for a record type
    #[error("Record type '{type_name}' is not registered: {message}")]
    TypeResolution { type_name: String, message: String },

    /// A record failed to decode into its registered type
    #[error("Failed to decode record of type '{type_name}': {message}")]
    Decode { type_name: String, message: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Registry operation error
    #[error("Registry error: {message}")]
    Registry { message: String },

    /// The workbook directory exists but holds no workbook files
    #[error("No workbook files found in: {path}")]
    EmptyTableDir { path: std::path::PathBuf },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Preference store error
    #[error("Preference store error: {message}")]
    Prefs { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a workbook error with context
    pub fn workbook(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<calamine::Error>,
    ) -> Self {
        Self::Workbook {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a sheet format error
    pub fn sheet_format(
        file: impl Into<String>,
        sheet: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::SheetFormat {
            file: file.into(),
            sheet: sheet.into(),
            message: message.into(),
        }
    }

    /// Create a type resolution error
    pub fn type_resolution(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TypeResolution {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a record decode error
    pub fn decode(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a JSON error with context
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a registry error
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }

    /// Create a preference store error
    pub fn prefs(message: impl Into<String>) -> Self {
        Self::Prefs {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json {
            message: "JSON processing failed".to_string(),
            source: error,
        }
    }
}

impl From<calamine::Error> for Error {
    fn from(error: calamine::Error) -> Self {
        Self::Workbook {
            file: "unknown".to_string(),
            message: "Workbook reading failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("TOML parsing failed: {error}"),
        }
    }
}

//! Command-line argument definitions for the sheetconf pipeline.
//!
//! Defines the CLI surface with the clap derive API. All three subcommands
//! share the same path arguments; paths given here override both the config
//! file and the built-in defaults.

use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the sheetconf pipeline
///
/// Compiles spreadsheet-authored balance tables into Rust record types and
/// JSON payload files, in two phases separated by a host rebuild.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sheetconf",
    version,
    about = "Compile spreadsheet balance tables into typed records and JSON payloads",
    long_about = "Reads workbook files whose sheets carry a three-row header (comment, field \
                  name, declared type), generates one Rust record type per workbook, and \
                  compiles data rows into JSON payload files keyed by row id. Generation and \
                  row compilation are separate commands because the generated types must be \
                  built into the host before rows can be validated against them."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the pipeline
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Generate record-type definitions from workbook headers (phase one)
    Generate(PipelineArgs),
    /// Compile data rows into JSON payload files (phase two)
    Compile(PipelineArgs),
    /// Scan workbooks and report what would be generated, without writing
    Check(PipelineArgs),
}

/// Path and verbosity arguments shared by every subcommand
#[derive(Debug, Clone, Parser)]
pub struct PipelineArgs {
    /// Directory containing the source workbook files
    ///
    /// Every .xlsx/.xls file in this directory is processed; editor lock
    /// files (~$Name.xlsx) are ignored. If not specified, defaults to
    /// assets/tables or the config file's value.
    #[arg(
        short = 't',
        long = "tables",
        value_name = "PATH",
        help = "Directory containing source workbook files"
    )]
    pub tables_dir: Option<PathBuf>,

    /// Output directory for generated record-type definitions
    ///
    /// One <FileName>Config.rs per workbook, written only when absent.
    /// If not specified, defaults to src/generated or the config file's value.
    #[arg(
        long = "types-out",
        value_name = "PATH",
        help = "Output directory for generated record types"
    )]
    pub types_dir: Option<PathBuf>,

    /// Output directory for compiled JSON payload files
    ///
    /// Cleared and rewritten in full on every compile run.
    /// If not specified, defaults to assets/configs or the config file's value.
    #[arg(
        long = "json-out",
        value_name = "PATH",
        help = "Output directory for compiled JSON payloads"
    )]
    pub payload_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file carrying the pipeline paths. CLI arguments
    /// override values from this file.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl PipelineArgs {
    /// Validate the shared arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(tables_dir) = &self.tables_dir {
            if !tables_dir.exists() {
                return Err(Error::configuration(format!(
                    "Tables directory does not exist: {}",
                    tables_dir.display()
                )));
            }
            if !tables_dir.is_dir() {
                return Err(Error::configuration(format!(
                    "Tables path is not a directory: {}",
                    tables_dir.display()
                )));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

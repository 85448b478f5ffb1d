//! Command implementations for the sheetconf CLI.
//!
//! Shared orchestration: logging setup, layered configuration loading, and
//! the final run summary. The per-command logic lives in the submodules.

use crate::cli::args::{Args, Commands, PipelineArgs};
use crate::config::Config;
use crate::{Error, Result};
use colored::Colorize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod check;
pub mod compile;
pub mod generate;

/// Statistics for a pipeline run, reported after every command
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Number of sheets scanned into table plans
    pub tables_scanned: usize,
    /// Number of files written (type definitions or payloads)
    pub files_written: usize,
    /// Number of records written across all payloads
    pub rows_written: usize,
    /// Number of rows skipped by failure isolation
    pub rows_skipped: usize,
    /// Number of tables that failed outright
    pub errors_encountered: usize,
    /// Total run time
    pub elapsed: Duration,
}

/// Main command runner for the pipeline.
///
/// Sets up logging, validates arguments, loads layered configuration, and
/// dispatches to the selected subcommand.
pub fn run(args: Args) -> Result<RunStats> {
    let start_time = Instant::now();

    let Some(command) = args.command else {
        return Err(Error::configuration("no command specified"));
    };

    let shared = match &command {
        Commands::Generate(shared) | Commands::Compile(shared) | Commands::Check(shared) => {
            shared.clone()
        }
    };

    setup_logging(&shared)?;
    shared.validate()?;

    let config = load_configuration(&shared)?;
    debug!("Loaded configuration: {config:?}");

    let mut stats = match command {
        Commands::Generate(_) => generate::run(&config)?,
        Commands::Compile(_) => compile::run(&config)?,
        Commands::Check(_) => check::run(&config)?,
    };

    stats.elapsed = start_time.elapsed();
    if !shared.quiet {
        print_summary(&stats);
    }

    Ok(stats)
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &PipelineArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sheetconf={log_level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {log_level}");
    Ok(())
}

/// Load configuration using the layered approach (defaults -> file -> args)
fn load_configuration(args: &PipelineArgs) -> Result<Config> {
    if let Some(config_file) = &args.config_file {
        info!("Using config file: {}", config_file.display());
    }

    let config = Config::load_layered(
        args.config_file.as_deref(),
        args.tables_dir.clone(),
        args.types_dir.clone(),
        args.payload_dir.clone(),
    )?;

    config.validate()?;
    Ok(config)
}

/// Print the human-readable run summary
fn print_summary(stats: &RunStats) {
    println!();
    println!("{}", "Run complete".green().bold());
    println!("  Sheets scanned:  {}", stats.tables_scanned);
    println!("  Files written:   {}", stats.files_written);
    if stats.rows_written > 0 || stats.rows_skipped > 0 {
        println!("  Records written: {}", stats.rows_written);
        println!("  Rows skipped:    {}", stats.rows_skipped);
    }
    if stats.errors_encountered > 0 {
        println!(
            "  {}",
            format!("Tables failed:   {}", stats.errors_encountered).red()
        );
    }
    println!("  Elapsed:         {:.2?}", stats.elapsed);
}

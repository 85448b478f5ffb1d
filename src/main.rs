use clap::Parser;
use sheetconf::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(_stats) => {
            // Success - the summary has already been printed by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {error:#}");
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Sheetconf - Spreadsheet Config Compiler");
    println!("=======================================");
    println!();
    println!("Compile spreadsheet-authored balance tables into Rust record types");
    println!("and JSON payload files keyed by row id.");
    println!();
    println!("USAGE:");
    println!("    sheetconf <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    generate    Generate record-type definitions from workbook headers");
    println!("    compile     Compile data rows into JSON payload files");
    println!("    check       Scan workbooks and report planned outputs without writing");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Generate missing record types from the default tables directory:");
    println!("    sheetconf generate");
    println!();
    println!("    # Compile rows with custom paths:");
    println!("    sheetconf compile --tables assets/tables --json-out assets/configs");
    println!();
    println!("    # Preview what a run would produce:");
    println!("    sheetconf check --tables assets/tables");
    println!();
    println!("For detailed help on any command, use:");
    println!("    sheetconf <COMMAND> --help");
}

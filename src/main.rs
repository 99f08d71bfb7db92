use clap::Parser;
use prim8_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Prim8 Processor - Field Observation Export Validator");
    println!("====================================================");
    println!();
    println!("Validates tab-delimited exports from the Prim8 data-collection app");
    println!("and generates the SQL transaction that loads them into the database.");
    println!();
    println!("USAGE:");
    println!("    prim8-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    check    Validate an export and print the findings report");
    println!("    write    Validate an export and emit its SQL import transaction");
    println!("    help     Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Review an export's findings:");
    println!("    prim8-processor check observations.txt");
    println!();
    println!("    # Save the findings as JSON:");
    println!("    prim8-processor check observations.txt --format json -o report.json");
    println!();
    println!("    # Rehearse the import (transaction ends with ROLLBACK):");
    println!("    prim8-processor write observations.txt -o import.sql");
    println!();
    println!("    # Emit the real import transaction:");
    println!("    prim8-processor write observations.txt --commit -o import.sql");
    println!();
    println!("For detailed help on any command, use:");
    println!("    prim8-processor <COMMAND> --help");
}

use cert_registry::cli::{args::Args, commands};
use clap::Parser;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    if let Err(error) = commands::run(args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Certificate Registry - spreadsheet import and registration lookup");
    println!("==================================================================");
    println!();
    println!("USAGE:");
    println!("    cert-registry [OPTIONS] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    import      Import a CSV/XLSX/XLS spreadsheet of certificates");
    println!("    lookup      Find a certificate by registration number");
    println!("    show        Show a certificate by record id");
    println!("    list        List the most recently written certificates");
    println!();
    println!("OPTIONS:");
    println!("    --config <FILE>        TOML configuration file");
    println!("    --database <PATH>      SQLite database file");
    println!("    --archive-dir <PATH>   Directory for archived uploads");
    println!("    --in-memory            Use a throw-away in-memory store");
    println!("    -v, -vv, -vvv          Increase logging verbosity");
    println!("    -q                     Only log errors");
    println!();
    println!("EXAMPLES:");
    println!("    # Import with automatic registration column detection:");
    println!("    cert-registry import batch-2024.xlsx");
    println!();
    println!("    # Import with an explicit column mapping:");
    println!("    cert-registry import marks.csv --map registrationNo=\"Roll No\" \\");
    println!("                                   --map studentName=Name");
    println!();
    println!("    # Look up a certificate:");
    println!("    cert-registry lookup REG123");
    println!();
    println!("For detailed help on any command, use:");
    println!("    cert-registry <COMMAND> --help");
}

//! Command implementations for the certificate registry CLI
//!
//! Each command lives in its own module:
//! - `import`: spreadsheet ingestion with optional column mapping
//! - `lookup`: lookup by registration number, and `show` by record id
//! - `list`: most recently written records

pub mod import;
pub mod list;
pub mod lookup;
pub mod shared;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner
///
/// Sets up logging, then dispatches to the subcommand handler. Returns an
/// error only when the command failed; "awaiting mapping" is a normal outcome.
pub fn run(args: Args) -> Result<()> {
    shared::setup_logging(&args.global)?;

    let Some(command) = &args.command else {
        return Ok(());
    };

    match command {
        Commands::Import(import_args) => {
            import::run_import(&args.global, import_args)?;
        }
        Commands::Lookup(lookup_args) => {
            lookup::run_lookup(&args.global, lookup_args)?;
        }
        Commands::Show(show_args) => {
            lookup::run_show(&args.global, show_args)?;
        }
        Commands::List(list_args) => {
            list::run_list(&args.global, list_args)?;
        }
    }
    Ok(())
}

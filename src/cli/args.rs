//! Command-line argument definitions for the certificate registry
//!
//! This module defines the CLI interface using the clap derive API. Storage,
//! configuration and logging options are global and may appear before or
//! after the subcommand.

use crate::Result;
use crate::app::services::record_normalizer::ColumnMapping;
use crate::constants::DEFAULT_LIST_LIMIT;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the certificate registry
///
/// Imports spreadsheets of issued certificates and looks records up by
/// registration number.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cert-registry",
    version,
    about = "Import certificate spreadsheets and look up records by registration number",
    long_about = "Imports CSV, TSV and Excel/ODS spreadsheets of issued certificates into a \
                  SQLite registry keyed by registration number. The registration column is \
                  detected from the headers; when none is recognised an explicit column \
                  mapping is requested. Re-importing a registration number replaces its record."
)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Default, clap::Args)]
pub struct GlobalArgs {
    /// Path to a TOML configuration file
    ///
    /// Defaults to `<config dir>/cert-registry/config.toml` when that file exists.
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// SQLite database file (overrides configuration)
    #[arg(long = "database", value_name = "PATH", global = true)]
    pub database: Option<PathBuf>,

    /// Directory receiving archived uploads (overrides configuration)
    #[arg(long = "archive-dir", value_name = "PATH", global = true)]
    pub archive_dir: Option<PathBuf>,

    /// Use a throw-away in-memory store instead of the database
    #[arg(long = "in-memory", global = true, conflicts_with = "database")]
    pub in_memory: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress logging except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl GlobalArgs {
    /// Get the appropriate log level based on verbosity and quiet settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Import a spreadsheet of certificate records
    Import(ImportArgs),
    /// Look up a certificate by registration number (case-insensitive)
    Lookup(LookupArgs),
    /// Show a certificate by record id
    Show(ShowArgs),
    /// List the most recently written certificates
    List(ListArgs),
}

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Spreadsheet to import (.csv, .xlsx, .xls by default)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Map a target field to a source header, e.g. `--map registrationNo="Roll No"`
    ///
    /// Repeatable. Supplying any mapping switches the import to mapped mode:
    /// records then hold the mapped fields plus the untouched source row.
    #[arg(long = "map", value_name = "FIELD=HEADER", action = clap::ArgAction::Append)]
    pub map: Vec<String>,

    /// JSON file holding a `{"field": "Header"}` column mapping
    ///
    /// `--map` entries are applied on top of the file.
    #[arg(long = "mapping-file", value_name = "FILE")]
    pub mapping_file: Option<PathBuf>,

    /// Skip archiving the uploaded file
    #[arg(long = "no-archive")]
    pub no_archive: bool,

    /// Print the outcome as JSON
    #[arg(long = "json")]
    pub json: bool,
}

impl ImportArgs {
    /// Combined column mapping, or `None` for automatic detection
    pub fn column_mapping(&self) -> Result<Option<ColumnMapping>> {
        if self.mapping_file.is_none() && self.map.is_empty() {
            return Ok(None);
        }

        let mut mapping = match &self.mapping_file {
            Some(path) => ColumnMapping::from_json_file(path)?,
            None => ColumnMapping::new(),
        };
        mapping.merge(ColumnMapping::from_pairs(&self.map)?);
        Ok(Some(mapping))
    }
}

/// Arguments for the lookup command
#[derive(Debug, Clone, Parser)]
pub struct LookupArgs {
    /// Registration number; surrounding whitespace and case are ignored
    #[arg(value_name = "REG_NO")]
    pub registration_no: String,

    /// Print the record as JSON
    #[arg(long = "json")]
    pub json: bool,
}

/// Arguments for the show command
#[derive(Debug, Clone, Parser)]
pub struct ShowArgs {
    /// Record id as printed by `list` or `lookup`
    #[arg(value_name = "ID")]
    pub id: String,

    /// Print the record as JSON
    #[arg(long = "json")]
    pub json: bool,
}

/// Arguments for the list command
#[derive(Debug, Clone, Parser)]
pub struct ListArgs {
    /// Number of records to show
    #[arg(
        short = 'n',
        long = "limit",
        value_name = "N",
        default_value_t = DEFAULT_LIST_LIMIT
    )]
    pub limit: usize,

    /// Print the records as JSON
    #[arg(long = "json")]
    pub json: bool,
}

//! Shared components for CLI commands
//!
//! Logging setup, configuration layering and store construction used by
//! every subcommand, plus a few output helpers.

use crate::Result;
use crate::app::models::CertificateRecord;
use crate::app::services::certificate_store::{
    CertificateStore, MemoryCertificateStore, SqliteCertificateStore,
};
use crate::cli::args::GlobalArgs;
use crate::config::Config;
use colored::*;
use serde::Serialize;
use tracing::{debug, info};

/// Set up structured logging on stderr
pub fn setup_logging(args: &GlobalArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cert_registry={}", log_level)));

    if args.quiet {
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
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load and validate configuration, applying command-line overrides last
pub fn load_configuration(args: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load(args.config_file.as_deref())?;

    if let Some(database) = &args.database {
        config = config.with_database_path(database);
    }
    if let Some(directory) = &args.archive_dir {
        config = config.with_archive_dir(directory);
    }
    if args.in_memory {
        config = config.without_archive();
    }

    config.validate()?;
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Open the store selected by the arguments
pub fn open_store(args: &GlobalArgs, config: &Config) -> Result<Box<dyn CertificateStore>> {
    if args.in_memory {
        info!("Using in-memory store; nothing will be persisted");
        return Ok(Box::new(MemoryCertificateStore::new()));
    }

    let store = SqliteCertificateStore::open(
        &config.storage.database_path,
        config.storage.busy_timeout_ms,
    )?;
    Ok(Box::new(store))
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Format a byte count in human-readable form
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// One-line summary of a record for listings
pub fn record_summary_line(record: &CertificateRecord) -> String {
    format!(
        "{}  {}  {}",
        record.registration_no.bright_white().bold(),
        record
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .dimmed(),
        record.id.bright_black()
    )
}

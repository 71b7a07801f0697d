//! Import command implementation

use super::shared::{format_size, load_configuration, open_store, print_json};
use crate::Result;
use crate::app::adapters::filesystem::read_upload;
use crate::app::services::ingestion::{
    Archiver, ImportReport, IngestOutcome, IngestionService, MappingRequest,
};
use crate::cli::args::{GlobalArgs, ImportArgs};
use colored::*;
use tracing::info;

/// Run the import command
pub fn run_import(global: &GlobalArgs, args: &ImportArgs) -> Result<IngestOutcome> {
    let config = load_configuration(global)?;
    let upload = read_upload(&args.file, &config.intake)?;
    let mapping = args.column_mapping()?;

    info!(
        "Importing {} ({})",
        args.file.display(),
        format_size(upload.bytes.len() as u64)
    );

    let archiver = (config.archive.enabled && !args.no_archive)
        .then(|| Archiver::new(&config.archive.directory));

    let store = open_store(global, &config)?;
    let service = IngestionService::new(store, archiver);
    let outcome = service.ingest(&upload, mapping.as_ref())?;

    if args.json {
        print_json(&outcome)?;
    } else {
        match &outcome {
            IngestOutcome::AwaitingMapping(request) => print_mapping_request(request),
            IngestOutcome::Imported(report) => print_report(report),
        }
    }

    Ok(outcome)
}

fn print_mapping_request(request: &MappingRequest) {
    println!(
        "{}",
        "No registration number column recognised".bright_yellow().bold()
    );
    println!(
        "  {} {}",
        "Rows:".bright_cyan(),
        request.total_rows.to_string().bright_white()
    );
    println!("  {}", "Headers:".bright_cyan());
    for header in &request.headers {
        let sample = request
            .sample_row
            .as_ref()
            .and_then(|row| row.get(header))
            .unwrap_or_default();
        println!("    {:<30} {}", header, sample.dimmed());
    }
    println!();
    println!(
        "Re-run with {} (and any other {} pairs) to import.",
        "--map registrationNo=\"<header>\"".bright_white(),
        "--map field=Header".bright_white()
    );
}

fn print_report(report: &ImportReport) {
    println!(
        "{} {} rows ({} new, {} updated)",
        "Imported".bright_green().bold(),
        report.imported.to_string().bright_white().bold(),
        report.inserted,
        report.updated
    );

    if let Some(path) = &report.archived_to {
        println!("  {} {}", "Archived to:".bright_cyan(), path.display());
    }

    if report.has_errors() {
        println!(
            "  {} {} rows rejected",
            "Warning:".bright_yellow(),
            report.errors.len()
        );
        for error in &report.errors {
            println!("    {}", error.to_string().yellow());
        }
    }
}

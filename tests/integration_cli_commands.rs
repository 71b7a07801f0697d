//! Integration tests for the CLI command handlers
//!
//! Arguments are parsed exactly as the binary parses them; handlers are then
//! called directly so no global logger is installed.

use cert_registry::Error;
use cert_registry::app::services::ingestion::IngestOutcome;
use cert_registry::cli::args::{Args, Commands};
use cert_registry::cli::commands::{import, list, lookup};
use clap::Parser;
use std::path::Path;
use tempfile::TempDir;

fn parse(dir: &Path, rest: &[&str]) -> Args {
    let database = dir.join("registry.sqlite");
    let archive = dir.join("archive");
    let mut argv = vec![
        "cert-registry".to_string(),
        "--database".to_string(),
        database.display().to_string(),
        "--archive-dir".to_string(),
        archive.display().to_string(),
    ];
    argv.extend(rest.iter().map(|s| s.to_string()));
    Args::try_parse_from(argv).unwrap()
}

fn run_import(dir: &Path, rest: &[&str]) -> cert_registry::Result<IngestOutcome> {
    let args = parse(dir, rest);
    match &args.command {
        Some(Commands::Import(import_args)) => import::run_import(&args.global, import_args),
        other => panic!("expected import, got {:?}", other),
    }
}

#[test]
fn test_import_lookup_show_list() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("marks.csv");
    std::fs::write(&file, "Student Name,Reg No,Grade\nAsha,REG123,A\nRavi,REG124,B\n").unwrap();

    let outcome = run_import(dir.path(), &["import", file.to_str().unwrap(), "--json"]).unwrap();
    assert_eq!(outcome.as_report().unwrap().imported, 2);
    assert!(dir.path().join("archive").is_dir());

    let args = parse(dir.path(), &["lookup", "  reg123 "]);
    let Some(Commands::Lookup(lookup_args)) = &args.command else {
        panic!("expected lookup");
    };
    let record = lookup::run_lookup(&args.global, lookup_args).unwrap();
    assert_eq!(record.registration_no, "REG123");

    let args = parse(dir.path(), &["show", record.id.as_str(), "--json"]);
    let Some(Commands::Show(show_args)) = &args.command else {
        panic!("expected show");
    };
    assert_eq!(lookup::run_show(&args.global, show_args).unwrap(), record);

    let args = parse(dir.path(), &["list", "--limit", "1"]);
    let Some(Commands::List(list_args)) = &args.command else {
        panic!("expected list");
    };
    assert_eq!(list::run_list(&args.global, list_args).unwrap().len(), 1);
}

#[test]
fn test_lookup_missing_and_empty() {
    let dir = TempDir::new().unwrap();

    let args = parse(dir.path(), &["lookup", "NOPE"]);
    let Some(Commands::Lookup(lookup_args)) = &args.command else {
        panic!("expected lookup");
    };
    let err = lookup::run_lookup(&args.global, lookup_args).unwrap_err();
    assert!(matches!(err, Error::RecordNotFound { .. }));

    let args = parse(dir.path(), &["lookup", "   "]);
    let Some(Commands::Lookup(lookup_args)) = &args.command else {
        panic!("expected lookup");
    };
    let err = lookup::run_lookup(&args.global, lookup_args).unwrap_err();
    assert!(matches!(err, Error::DataValidation { .. }));
}

#[test]
fn test_import_awaiting_mapping_then_mapped() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("batch.csv");
    std::fs::write(&file, "Student,Roll\nAsha,R-1\n").unwrap();
    let file = file.to_str().unwrap().to_string();

    let outcome = run_import(dir.path(), &["import", file.as_str(), "--json"]).unwrap();
    assert!(outcome.is_awaiting_mapping());

    let outcome = run_import(
        dir.path(),
        &[
            "import",
            file.as_str(),
            "--map",
            "registrationNo=Roll",
            "--map",
            "studentName=Student",
            "--no-archive",
        ],
    )
    .unwrap();
    let report = outcome.as_report().unwrap();
    assert_eq!(report.imported, 1);
    assert!(report.archived_to.is_none());
}

#[test]
fn test_import_rejects_disallowed_extension() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "Reg No\nX1\n").unwrap();

    let err = run_import(dir.path(), &["import", file.to_str().unwrap()]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { .. }));
}

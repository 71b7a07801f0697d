//! Tests for outcome serialization

use crate::app::models::{RawRow, RowError};
use crate::app::services::ingestion::{ImportReport, IngestOutcome, MappingRequest};
use std::path::PathBuf;

#[test]
fn test_awaiting_mapping_json_shape() {
    let outcome = IngestOutcome::AwaitingMapping(MappingRequest {
        headers: vec!["Name".into(), "Course".into()],
        sample_row: Some([("Name", "A"), ("Course", "Rust")].into_iter().collect::<RawRow>()),
        total_rows: 2,
    });

    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["status"], "awaitingMapping");
    assert_eq!(value["totalRows"], 2);
    assert_eq!(value["sampleRow"]["Course"], "Rust");
    assert_eq!(value["headers"][1], "Course");
}

#[test]
fn test_imported_json_shape() {
    let outcome = IngestOutcome::Imported(ImportReport {
        imported: 3,
        inserted: 2,
        updated: 1,
        errors: vec![RowError::new(4, "Missing registration number")],
        archived_to: Some(PathBuf::from("backups/1_marks.csv")),
    });

    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["status"], "imported");
    assert_eq!(value["imported"], 3);
    assert_eq!(value["errors"][0]["row"], 4);
    assert_eq!(value["errors"][0]["error"], "Missing registration number");
    assert_eq!(value["archivedTo"], "backups/1_marks.csv");

    let back: IngestOutcome = serde_json::from_value(value).unwrap();
    assert_eq!(back, outcome);
}

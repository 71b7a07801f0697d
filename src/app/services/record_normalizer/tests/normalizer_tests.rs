//! Tests for auto and mapped normalization

use super::*;
use crate::app::models::{FieldValue, RecordData};
use crate::app::services::record_normalizer::{
    ColumnMapping, NormalizeMode, normalize_row, normalize_rows,
};

fn auto(column: Option<&str>) -> NormalizeMode {
    NormalizeMode::Auto {
        registration_column: column.map(str::to_string),
    }
}

#[test]
fn test_auto_uses_resolved_column_and_keeps_row() {
    let row = sample_row();
    let cert = normalize_row(&row, 0, &auto(Some("Reg No"))).unwrap();

    assert_eq!(cert.registration_no, "X1");
    assert_eq!(cert.data, RecordData::from(&row));
}

#[test]
fn test_auto_trims_registration() {
    let row = row(&[("Reg No", "  X9 \t")]);
    let cert = normalize_row(&row, 0, &auto(Some("Reg No"))).unwrap();
    assert_eq!(cert.registration_no, "X9");
    // payload keeps the cell verbatim
    assert_eq!(cert.data.get("Reg No"), Some(&FieldValue::from("  X9 \t")));
}

#[test]
fn test_auto_falls_back_to_first_header() {
    let row = row(&[("Roll", "R-7"), ("Name", "A")]);
    let cert = normalize_row(&row, 3, &auto(None)).unwrap();
    assert_eq!(cert.registration_no, "R-7");

    // an unknown resolved column counts as absent too
    let cert = normalize_row(&row, 3, &auto(Some("Missing"))).unwrap();
    assert_eq!(cert.registration_no, "R-7");
}

#[test]
fn test_auto_synthetic_id_only_for_absent_values() {
    let empty = RawRow::new();
    let cert = normalize_row(&empty, 4, &auto(None)).unwrap();
    assert_eq!(cert.registration_no, "ROW_4");

    // a present but empty cell is rejected, not replaced
    let row = row(&[("Reg No", ""), ("Name", "A")]);
    assert_eq!(
        normalize_row(&row, 0, &auto(Some("Reg No"))),
        Err("Missing registration number")
    );
}

#[test]
fn test_rejections_report_sheet_rows() {
    let rows = vec![
        row(&[("Name", "A"), ("Reg No", "X1")]),
        row(&[("Name", "B"), ("Reg No", "   ")]),
        row(&[("Name", "C"), ("Reg No", "X3")]),
    ];
    let batch = normalize_rows(&rows, &auto(Some("Reg No")));

    assert_eq!(batch.accepted.len(), 2);
    assert_eq!(batch.errors.len(), 1);
    assert_eq!(batch.errors[0].row, 3);
    assert_eq!(batch.errors[0].error, "Missing registration number");
    assert_eq!(batch.total_rows(), 3);
}

#[test]
fn test_mapped_builds_fields_and_original() {
    let row = sample_row();
    let mapping = ColumnMapping::new()
        .with("registrationNo", "Reg No")
        .with("studentName", "Name")
        .with("fatherName", "")
        .with("courseName", "Course");

    let cert = normalize_row(&row, 0, &NormalizeMode::Mapped(mapping)).unwrap();
    assert_eq!(cert.registration_no, "X1");

    let keys: Vec<&str> = cert.data.keys().collect();
    assert_eq!(keys, vec!["registrationNo", "studentName", "_original"]);
    assert_eq!(cert.data.get("studentName"), Some(&FieldValue::from("A")));

    let original = cert.data.get("_original").and_then(FieldValue::as_nested);
    assert_eq!(original, Some(&RecordData::from(&row)));
}

#[test]
fn test_mapped_without_registration_entry() {
    let mapping = ColumnMapping::new().with("studentName", "Name");
    let batch = normalize_rows(&[sample_row()], &NormalizeMode::Mapped(mapping));

    assert!(batch.accepted.is_empty());
    assert_eq!(
        batch.errors[0].error,
        "Registration number column mapping is required"
    );
    assert_eq!(batch.errors[0].row, 2);
}

#[test]
fn test_mapped_missing_or_empty_cell() {
    let mapping = ColumnMapping::new().with("registrationNo", "Roll");
    let mode = NormalizeMode::Mapped(mapping);

    assert_eq!(
        normalize_row(&sample_row(), 0, &mode),
        Err("Missing registration number")
    );
    let blank = row(&[("Roll", " ")]);
    assert_eq!(
        normalize_row(&blank, 0, &mode),
        Err("Missing registration number")
    );
}

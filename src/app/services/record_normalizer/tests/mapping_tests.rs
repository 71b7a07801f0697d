//! Tests for column mapping construction

use crate::Error;
use crate::app::services::record_normalizer::ColumnMapping;
use crate::app::services::record_normalizer::mapping::parse_pair;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_from_pairs_preserves_order() {
    let mapping =
        ColumnMapping::from_pairs(["registrationNo=Roll", "studentName = Student Name"]).unwrap();

    let entries: Vec<(&str, &str)> = mapping.iter().collect();
    assert_eq!(
        entries,
        vec![("registrationNo", "Roll"), ("studentName", "Student Name")]
    );
    assert_eq!(mapping.registration_source(), Some("Roll"));
}

#[test]
fn test_parse_pair_keeps_equals_in_header() {
    let (target, source) = parse_pair("grade=Grade (A=best)").unwrap();
    assert_eq!(target, "grade");
    assert_eq!(source, "Grade (A=best)");
}

#[test]
fn test_parse_pair_rejects_malformed() {
    assert!(matches!(
        parse_pair("no-separator"),
        Err(Error::DataValidation { .. })
    ));
    assert!(parse_pair(" =Header").is_err());
}

#[test]
fn test_from_json_object() {
    let mapping =
        ColumnMapping::from_json(r#"{"registrationNo": "Reg", "courseName": "Course"}"#).unwrap();
    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping.source_for("courseName"), Some("Course"));
}

#[test]
fn test_from_json_rejects_non_object() {
    let err = ColumnMapping::from_json(r#"["registrationNo"]"#).unwrap_err();
    assert!(matches!(err, Error::Serialization { .. }));
}

#[test]
fn test_from_json_file_and_merge() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"registrationNo": "Reg", "grade": "Grade"}}"#).unwrap();

    let mut mapping = ColumnMapping::from_json_file(file.path()).unwrap();
    mapping.merge(ColumnMapping::new().with("registrationNo", "Roll No"));

    assert_eq!(mapping.registration_source(), Some("Roll No"));
    assert_eq!(mapping.source_for("grade"), Some("Grade"));
}

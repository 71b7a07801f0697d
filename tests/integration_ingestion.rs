//! Integration tests for the ingestion pipeline over a SQLite store
//!
//! These tests drive uploads from disk through intake, parsing, normalization,
//! storage and archival, the way the `import` command does.

use cert_registry::app::adapters::filesystem::read_upload;
use cert_registry::app::services::certificate_store::{CertificateStore, SqliteCertificateStore};
use cert_registry::app::services::certificate_view::CertificateView;
use cert_registry::app::services::column_resolver::resolve_registration_column;
use cert_registry::app::services::ingestion::{Archiver, IngestOutcome, IngestionService};
use cert_registry::app::services::record_normalizer::ColumnMapping;
use cert_registry::config::IntakeConfig;
use cert_registry::{FieldValue, RecordData};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    store: Arc<SqliteCertificateStore>,
    service: IngestionService<Arc<SqliteCertificateStore>>,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store =
            Arc::new(SqliteCertificateStore::open(&dir.path().join("certs.sqlite"), 2_000).unwrap());
        let archiver = Archiver::new(dir.path().join("backups"));
        let service = IngestionService::new(Arc::clone(&store), Some(archiver));
        Self {
            dir,
            store,
            service,
        }
    }

    fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn import(&self, path: &Path, mapping: Option<&ColumnMapping>) -> IngestOutcome {
        let upload = read_upload(path, &IntakeConfig::default()).unwrap();
        self.service.ingest(&upload, mapping).unwrap()
    }

    fn archived_files(&self) -> usize {
        match std::fs::read_dir(self.dir.path().join("backups")) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}

fn text_data(fields: &[(&str, &str)]) -> RecordData {
    fields
        .iter()
        .map(|(k, v)| (*k, FieldValue::from(*v)))
        .collect()
}

#[test]
fn test_registration_no_header_is_detected() {
    let headers: Vec<String> = ["Student Name", "registration NO", "Grade"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(resolve_registration_column(&headers), Some("registration NO"));
}

#[test]
fn test_csv_import_round_trip() {
    let fx = Fixture::new();
    let path = fx.write("marks.csv", b"Name,Reg No,Grade\nA,X1,B+\n");

    let outcome = fx.import(&path, None);
    let report = outcome.as_report().unwrap();
    assert_eq!(report.imported, 1);
    assert!(report.errors.is_empty());
    assert!(report.archived_to.is_some());
    assert_eq!(fx.archived_files(), 1);

    let record = fx.store.find_by_registration_no(" x1 ").unwrap().unwrap();
    assert_eq!(record.registration_no, "X1");
    assert_eq!(
        record.data,
        text_data(&[("Name", "A"), ("Reg No", "X1"), ("Grade", "B+")])
    );
}

#[test]
fn test_two_phase_upload() {
    let fx = Fixture::new();
    let path = fx.write("batch.csv", b"Student,Roll,Course\nAsha,R-1,Rust\nRavi,R-2,Go\n");

    // phase one: no registration-like header
    let outcome = fx.import(&path, None);
    let IngestOutcome::AwaitingMapping(request) = outcome else {
        panic!("expected a mapping request");
    };
    assert_eq!(request.headers, vec!["Student", "Roll", "Course"]);
    assert_eq!(request.total_rows, 2);
    assert_eq!(fx.store.count().unwrap(), 0);
    assert_eq!(fx.archived_files(), 0);

    // phase two: the administrator maps the columns
    let mapping = ColumnMapping::from_pairs([
        "registrationNo=Roll",
        "studentName=Student",
        "courseName=Course",
    ])
    .unwrap();
    let outcome = fx.import(&path, Some(&mapping));
    let report = outcome.as_report().unwrap();
    assert_eq!((report.imported, report.inserted), (2, 2));
    assert_eq!(fx.archived_files(), 1);

    let record = fx.store.find_by_registration_no("r-2").unwrap().unwrap();
    let view = CertificateView::from_record(&record);
    assert_eq!(view.student_name, "Ravi");
    assert_eq!(view.course_name, "Go");
}

#[test]
fn test_reimport_overwrites_and_keeps_id() {
    let fx = Fixture::new();
    let first = fx.write("v1.csv", b"Name,Reg No\nFirst,X1\nOther,X2\n");
    let second = fx.write("v2.csv", b"Name,Reg No\nSecond,X1\n");

    fx.import(&first, None);
    let original = fx.store.find_by_registration_no("X1").unwrap().unwrap();

    let outcome = fx.import(&second, None);
    let report = outcome.as_report().unwrap();
    assert_eq!((report.inserted, report.updated), (0, 1));

    let updated = fx.store.find_by_registration_no("X1").unwrap().unwrap();
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.data.get("Name"), Some(&FieldValue::from("Second")));
    assert_eq!(fx.store.count().unwrap(), 2);

    // the rewritten record is now the most recent
    let recent = fx.store.list_recent(1).unwrap();
    assert_eq!(recent[0].registration_no, "X1");
    assert_eq!(fx.archived_files(), 2);
}

#[test]
fn test_partial_failures_are_reported() {
    let fx = Fixture::new();
    let path = fx.write(
        "mixed.csv",
        b"Name,Registration No\nA,X1\nB,\nC,X3\n,\nD,   \n",
    );

    let outcome = fx.import(&path, None);
    let report = outcome.as_report().unwrap();
    assert_eq!(report.imported, 2);
    let rows: Vec<usize> = report.errors.iter().map(|e| e.row).collect();
    // the fully blank row is dropped by the parser, so D is data row index 3
    assert_eq!(rows, vec![3, 5]);
    assert!(report
        .errors
        .iter()
        .all(|e| e.error == "Missing registration number"));
}

#[test]
fn test_whitespace_only_row_is_reported() {
    let fx = Fixture::new();
    let path = fx.write("spaces.csv", b"Name,Reg No\nA,X1\n , \nB,\n");

    let outcome = fx.import(&path, None);
    let report = outcome.as_report().unwrap();
    assert_eq!(report.imported, 1);
    let rows: Vec<usize> = report.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![3, 4]);
    assert_eq!(fx.store.count().unwrap(), 1);
}

#[test]
fn test_xlsx_import() {
    let fx = Fixture::new();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["STUDENT NAME", "REGISTRATION NO", "GRADE", "ISSUE DATE"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    sheet.write_string(1, 0, "Asha").unwrap();
    sheet.write_number(1, 1, 1042.0).unwrap();
    sheet.write_string(1, 2, "A").unwrap();
    sheet.write_string(1, 3, "2024-06-30").unwrap();
    let path = fx.write("results.xlsx", &workbook.save_to_buffer().unwrap());

    let outcome = fx.import(&path, None);
    assert_eq!(outcome.as_report().unwrap().imported, 1);

    let record = fx.store.find_by_registration_no("1042").unwrap().unwrap();
    let view = CertificateView::from_record(&record);
    assert_eq!(view.student_name, "Asha");
    assert_eq!(view.grade, "A");
    assert_eq!(view.issue_date, "2024-06-30");
}

#[test]
fn test_store_survives_reopen() {
    let fx = Fixture::new();
    let path = fx.write("marks.csv", b"Name,Reg No\nA,X1\n");
    fx.import(&path, None);

    let reopened = SqliteCertificateStore::open(&fx.dir.path().join("certs.sqlite"), 2_000).unwrap();
    assert!(reopened.find_by_registration_no("X1").unwrap().is_some());
}

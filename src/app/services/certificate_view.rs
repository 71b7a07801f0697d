//! Certificate view: well-known fields pulled out of a stored record
//!
//! Records keep whatever headers the uploaded sheet had, so each well-known
//! field is looked up under several spellings. Mapped records use canonical
//! names (`studentName`); auto-imported records keep sheet headers such as
//! `STUDENT NAME` or `Student Name`. The first non-blank variant wins.
//!
//! Everything that is not a well-known field is exposed as an additional
//! field, read from the `_original` row when the record has one.

use crate::app::models::{CertificateRecord, FieldValue, RecordData};
use crate::constants::ORIGINAL_ROW_KEY;
use serde::Serialize;

const STUDENT_NAME: &[&str] = &["studentName", "STUDENT NAME", "Student Name"];
const REGISTRATION_NO: &[&str] = &["registrationNo", "REGISTRATION NO", "Registration No"];
const FATHER_NAME: &[&str] = &["fatherName", "FATHERS NAME", "Father's Name"];
const COURSE_NAME: &[&str] = &["courseName", "COURSE NAME", "Course Name"];
const START_DATE: &[&str] = &["startDate", "STARTING DATE", "Start Date"];
const END_DATE: &[&str] = &["endDate", "END DATE", "End Date"];
const ISSUE_DATE: &[&str] = &["issueDate", "ISSUE DATE", "Issue Date"];
const GRADE: &[&str] = &["grade", "GRADE", "Grade"];

const KNOWN_FIELDS: &[&[&str]] = &[
    STUDENT_NAME,
    REGISTRATION_NO,
    FATHER_NAME,
    COURSE_NAME,
    START_DATE,
    END_DATE,
    ISSUE_DATE,
    GRADE,
];

/// Rendering-ready projection of a certificate record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateView {
    pub registration_no: String,
    pub student_name: String,
    pub father_name: String,
    pub course_name: String,
    pub start_date: String,
    pub end_date: String,
    pub issue_date: String,
    pub grade: String,
    /// Remaining fields as `(label source key, value)`, in stored order
    pub additional_fields: Vec<(String, String)>,
}

impl CertificateView {
    pub fn from_record(record: &CertificateRecord) -> Self {
        let data = &record.data;

        let registration_no = if record.registration_no.trim().is_empty() {
            first_present(data, REGISTRATION_NO)
        } else {
            record.registration_no.clone()
        };

        Self {
            registration_no,
            student_name: first_present(data, STUDENT_NAME),
            father_name: first_present(data, FATHER_NAME),
            course_name: first_present(data, COURSE_NAME),
            start_date: first_present(data, START_DATE),
            end_date: first_present(data, END_DATE),
            issue_date: first_present(data, ISSUE_DATE),
            grade: first_present(data, GRADE),
            additional_fields: additional_fields(data),
        }
    }

    /// Well-known fields with display labels, skipping empty ones
    pub fn known_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Registration No", self.registration_no.as_str()),
            ("Student Name", self.student_name.as_str()),
            ("Father's Name", self.father_name.as_str()),
            ("Course Name", self.course_name.as_str()),
            ("Start Date", self.start_date.as_str()),
            ("End Date", self.end_date.as_str()),
            ("Issue Date", self.issue_date.as_str()),
            ("Grade", self.grade.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

fn first_present(data: &RecordData, variants: &[&str]) -> String {
    variants
        .iter()
        .filter_map(|key| data.get(key))
        .find(|value| !value.is_blank())
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn is_known_field(key: &str) -> bool {
    key == ORIGINAL_ROW_KEY || KNOWN_FIELDS.iter().any(|variants| variants.contains(&key))
}

fn additional_fields(data: &RecordData) -> Vec<(String, String)> {
    let source = data
        .get(ORIGINAL_ROW_KEY)
        .and_then(FieldValue::as_nested)
        .unwrap_or(data);

    source
        .iter()
        .filter(|(key, _)| !is_known_field(key))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Human label for a field key: `_` becomes a space, camelCase is split and
/// the first letter is capitalised
pub fn field_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    let mut previous: Option<char> = None;

    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_uppercase() && previous.is_some_and(|p| p.is_lowercase()) {
            label.push(' ');
        }
        if !(c == ' ' && label.ends_with(' ')) {
            label.push(c);
        }
        previous = Some(c);
    }

    let label = label.trim();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! Core data structures for certificate ingestion and storage.
//!
//! Defines the raw spreadsheet row, the open-ended record payload, and the
//! persisted certificate record shared by the parser, normalizer and stores.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One spreadsheet row: header name to cell text, in header order
///
/// Absent cells are stored as empty strings so downstream string handling
/// never has to distinguish missing from blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    cells: IndexMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row by pairing headers with cell values, padding with empty strings
    pub fn from_cells<I, S>(headers: &[String], values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = values.into_iter();
        let cells = headers
            .iter()
            .map(|header| {
                let value = values.next().map(Into::into).unwrap_or_default();
                (header.clone(), value)
            })
            .collect();
        Self { cells }
    }

    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(header.into(), value.into());
    }

    /// Cell value for `header`, or `None` when the header is not part of this row
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells.get(header).map(String::as_str)
    }

    pub fn first(&self) -> Option<(&str, &str)> {
        self.cells
            .first()
            .map(|(header, value)| (header.as_str(), value.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when no cell holds any text; whitespace counts as a value
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A single value in a record payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Number(f64),
    Text(String),
    Nested(RecordData),
}

impl FieldValue {
    pub fn as_nested(&self) -> Option<&RecordData> {
        match self {
            FieldValue::Nested(data) => Some(data),
            _ => None,
        }
    }

    /// Whether the value carries nothing worth rendering
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Nested(data) => data.is_empty(),
            FieldValue::Number(_) => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Nested(data) => {
                let parts: Vec<String> = data.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<RecordData> for FieldValue {
    fn from(value: RecordData) -> Self {
        FieldValue::Nested(value)
    }
}

/// Open-ended record payload: field name to value, insertion ordered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordData {
    fields: IndexMap<String, FieldValue>,
}

impl RecordData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<&RawRow> for RecordData {
    fn from(row: &RawRow) -> Self {
        row.iter().map(|(k, v)| (k, FieldValue::from(v))).collect()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for RecordData {
    fn from_iter<T: IntoIterator<Item = (K, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A stored certificate, as returned by every store read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// Opaque identifier assigned on first insert
    pub id: String,
    /// Trimmed, case-preserved registration number
    pub registration_no: String,
    pub data: RecordData,
    /// Stamped on every upsert of this registration number
    pub created_at: DateTime<Utc>,
}

/// An accepted row waiting to be upserted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCertificate {
    pub registration_no: String,
    pub data: RecordData,
}

impl NewCertificate {
    pub fn new(registration_no: impl Into<String>, data: RecordData) -> Self {
        Self {
            registration_no: registration_no.into(),
            data,
        }
    }
}

/// A row rejected during normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Position of the row among the parsed data rows, plus 2
    ///
    /// Matches the sheet line when no fully empty rows precede it; empty rows
    /// are dropped by the parser and do not advance the count.
    pub row: usize,
    pub error: String,
}

impl RowError {
    pub fn new(row: usize, error: impl Into<String>) -> Self {
        Self {
            row,
            error: error.into(),
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.error)
    }
}

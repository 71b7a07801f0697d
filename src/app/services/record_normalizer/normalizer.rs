//! Row to certificate normalization in auto and mapped mode

use super::mapping::ColumnMapping;
use crate::app::models::{FieldValue, NewCertificate, RawRow, RecordData, RowError};
use crate::constants::{
    HEADER_ROW_OFFSET, MISSING_REGISTRATION_REASON, ORIGINAL_ROW_KEY, SYNTHETIC_ID_PREFIX,
    UNMAPPED_REGISTRATION_REASON,
};
use serde::Serialize;
use tracing::debug;

/// How registration numbers and payloads are derived from rows
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeMode {
    /// Detected column (or fallbacks); payload is the row verbatim
    Auto { registration_column: Option<String> },
    /// Administrator mapping; payload is the mapped fields plus `_original`
    Mapped(ColumnMapping),
}

/// Accepted certificates and per-row rejections, in sheet order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedBatch {
    pub accepted: Vec<NewCertificate>,
    pub errors: Vec<RowError>,
}

impl NormalizedBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_rows(&self) -> usize {
        self.accepted.len() + self.errors.len()
    }
}

/// Normalize every row, collecting rejections instead of failing
pub fn normalize_rows(rows: &[RawRow], mode: &NormalizeMode) -> NormalizedBatch {
    let mut batch = NormalizedBatch::new();

    for (index, row) in rows.iter().enumerate() {
        match normalize_row(row, index, mode) {
            Ok(certificate) => batch.accepted.push(certificate),
            Err(reason) => {
                let error = RowError::new(index + HEADER_ROW_OFFSET, reason);
                debug!("Rejected {}", error);
                batch.errors.push(error);
            }
        }
    }

    batch
}

/// Normalize a single row; `index` is the 0-based data row index
pub fn normalize_row(
    row: &RawRow,
    index: usize,
    mode: &NormalizeMode,
) -> std::result::Result<NewCertificate, &'static str> {
    match mode {
        NormalizeMode::Auto {
            registration_column,
        } => {
            let registration = registration_column
                .as_deref()
                .and_then(|column| row.get(column))
                .or_else(|| row.first().map(|(_, value)| value))
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}{}", SYNTHETIC_ID_PREFIX, index));

            let registration = registration.trim();
            if registration.is_empty() {
                return Err(MISSING_REGISTRATION_REASON);
            }

            Ok(NewCertificate::new(registration, RecordData::from(row)))
        }
        NormalizeMode::Mapped(mapping) => {
            let source = mapping
                .registration_source()
                .ok_or(UNMAPPED_REGISTRATION_REASON)?;

            let registration = row
                .get(source)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .ok_or(MISSING_REGISTRATION_REASON)?;

            let mut data = RecordData::new();
            for (target, source) in mapping.iter() {
                if source.is_empty() {
                    continue;
                }
                if let Some(value) = row.get(source) {
                    data.insert(target, value);
                }
            }
            data.insert(ORIGINAL_ROW_KEY, FieldValue::Nested(RecordData::from(row)));

            Ok(NewCertificate::new(registration, data))
        }
    }
}

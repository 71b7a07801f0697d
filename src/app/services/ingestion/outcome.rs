//! Ingestion results returned to callers

use crate::app::models::{RawRow, RowError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of one ingestion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum IngestOutcome {
    /// No registration column was found; the caller must supply a mapping
    AwaitingMapping(MappingRequest),
    /// Rows were normalized and written
    Imported(ImportReport),
}

impl IngestOutcome {
    pub fn is_awaiting_mapping(&self) -> bool {
        matches!(self, IngestOutcome::AwaitingMapping(_))
    }

    pub fn as_report(&self) -> Option<&ImportReport> {
        match self {
            IngestOutcome::Imported(report) => Some(report),
            IngestOutcome::AwaitingMapping(_) => None,
        }
    }

    pub fn as_mapping_request(&self) -> Option<&MappingRequest> {
        match self {
            IngestOutcome::AwaitingMapping(request) => Some(request),
            IngestOutcome::Imported(_) => None,
        }
    }
}

/// What the administrator needs to build a column mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRequest {
    pub headers: Vec<String>,
    /// First data row, to preview cell values
    pub sample_row: Option<RawRow>,
    pub total_rows: usize,
}

/// Summary of a completed import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Rows accepted by normalization and written to the store
    pub imported: usize,
    /// Distinct registration numbers that were new
    pub inserted: usize,
    /// Distinct registration numbers that were overwritten
    pub updated: usize,
    /// Rejected rows, in sheet order
    pub errors: Vec<RowError>,
    /// Archived copy of the upload; `None` when archiving is off or failed
    pub archived_to: Option<PathBuf>,
}

impl ImportReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

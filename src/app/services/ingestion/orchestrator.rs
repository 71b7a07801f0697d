//! Parse, resolve, normalize, store and archive one upload

use super::archive::Archiver;
use super::outcome::{ImportReport, IngestOutcome, MappingRequest};
use crate::Result;
use crate::app::services::certificate_store::{BatchSummary, CertificateStore};
use crate::app::services::column_resolver::resolve_registration_column;
use crate::app::services::record_normalizer::{ColumnMapping, NormalizeMode, normalize_rows};
use crate::app::services::tabular_parser::{self, SheetFormat};
use std::time::Instant;
use tracing::{debug, info, warn};

/// An uploaded spreadsheet awaiting ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Name the file was uploaded under; only its last component is archived
    pub file_name: String,
    pub format: SheetFormat,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, format: SheetFormat, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            format,
            bytes,
        }
    }

    /// Build an upload whose format comes from the file name's extension
    pub fn from_file_name(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let format = SheetFormat::from_hint(&file_name)?;
        Ok(Self::new(file_name, format, bytes))
    }
}

/// Runs uploads through the ingestion pipeline against one store
#[derive(Debug)]
pub struct IngestionService<S> {
    store: S,
    archiver: Option<Archiver>,
}

impl<S: CertificateStore> IngestionService<S> {
    pub fn new(store: S, archiver: Option<Archiver>) -> Self {
        Self { store, archiver }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ingest one upload
    ///
    /// Without `mapping`, a sheet with rows but no recognisable registration
    /// column yields [`IngestOutcome::AwaitingMapping`] and nothing is written.
    /// Row-level problems are reported in the outcome; only parse and store
    /// failures are returned as errors.
    pub fn ingest(&self, upload: &Upload, mapping: Option<&ColumnMapping>) -> Result<IngestOutcome> {
        let start = Instant::now();
        info!(
            "Ingesting '{}' ({} bytes, {})",
            upload.file_name,
            upload.bytes.len(),
            upload.format
        );

        let sheet = tabular_parser::parse(&upload.bytes, upload.format)?;

        let mode = match mapping {
            Some(mapping) => {
                debug!("Using explicit mapping with {} entries", mapping.len());
                NormalizeMode::Mapped(mapping.clone())
            }
            None => {
                let column = resolve_registration_column(&sheet.headers).map(str::to_string);
                if column.is_none() && !sheet.rows.is_empty() {
                    info!(
                        "No registration column in '{}' ({} rows); column mapping required",
                        upload.file_name,
                        sheet.rows.len()
                    );
                    return Ok(IngestOutcome::AwaitingMapping(MappingRequest {
                        sample_row: sheet.rows.first().cloned(),
                        total_rows: sheet.rows.len(),
                        headers: sheet.headers,
                    }));
                }
                NormalizeMode::Auto {
                    registration_column: column,
                }
            }
        };

        let batch = normalize_rows(&sheet.rows, &mode);
        let imported = batch.accepted.len();

        let summary = if batch.accepted.is_empty() {
            BatchSummary::new()
        } else {
            self.store.upsert_batch(batch.accepted)?
        };

        let archived_to = self.archive(upload);

        info!(
            "Imported {} of {} rows from '{}' ({} inserted, {} updated, {} rejected) in {:.2?}",
            imported,
            sheet.rows.len(),
            upload.file_name,
            summary.inserted,
            summary.updated,
            batch.errors.len(),
            start.elapsed()
        );

        Ok(IngestOutcome::Imported(ImportReport {
            imported,
            inserted: summary.inserted,
            updated: summary.updated,
            errors: batch.errors,
            archived_to,
        }))
    }

    fn archive(&self, upload: &Upload) -> Option<std::path::PathBuf> {
        let archiver = self.archiver.as_ref()?;
        match archiver.archive(&upload.file_name, &upload.bytes) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Failed to archive '{}': {}", upload.file_name, e);
                None
            }
        }
    }
}

//! Ingestion orchestrator
//!
//! Drives one upload through parse → resolve → normalize → store → archive and
//! folds partial failures into the returned outcome.
//!
//! ## Usage
//!
//! ```rust
//! use cert_registry::app::services::certificate_store::MemoryCertificateStore;
//! use cert_registry::app::services::ingestion::{IngestionService, Upload};
//!
//! # fn example() -> cert_registry::Result<()> {
//! let service = IngestionService::new(MemoryCertificateStore::new(), None);
//! let upload = Upload::from_file_name("marks.csv", b"Name,Reg No\nA,X1\n".to_vec())?;
//! let outcome = service.ingest(&upload, None)?;
//! assert_eq!(outcome.as_report().map(|r| r.imported), Some(1));
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod orchestrator;
pub mod outcome;

#[cfg(test)]
pub mod tests;

pub use archive::Archiver;
pub use orchestrator::{IngestionService, Upload};
pub use outcome::{ImportReport, IngestOutcome, MappingRequest};

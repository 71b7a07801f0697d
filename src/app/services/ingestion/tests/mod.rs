//! Test utilities for ingestion orchestrator testing

use crate::app::services::certificate_store::MemoryCertificateStore;
use crate::app::services::ingestion::{Archiver, IngestionService, Upload};
use std::sync::Arc;
use tempfile::TempDir;

mod outcome_tests;

/// Service over a shared in-memory store, without archiving
pub fn memory_service() -> (Arc<MemoryCertificateStore>, IngestionService<Arc<MemoryCertificateStore>>) {
    let store = Arc::new(MemoryCertificateStore::new());
    let service = IngestionService::new(Arc::clone(&store), None);
    (store, service)
}

/// Service archiving into a fresh temporary directory
pub fn archiving_service() -> (TempDir, IngestionService<MemoryCertificateStore>) {
    let dir = TempDir::new().unwrap();
    let archiver = Archiver::new(dir.path().join("backups"));
    let service = IngestionService::new(MemoryCertificateStore::new(), Some(archiver));
    (dir, service)
}

/// Helper to wrap CSV text as an upload
pub fn csv_upload(content: &str) -> Upload {
    Upload::from_file_name("upload.csv", content.as_bytes().to_vec()).unwrap()
}

//! Upsert store for certificate records
//!
//! Records are keyed by their trimmed, case-preserved registration number and
//! there is at most one record per exact key. Lookups are case-insensitive.
//!
//! ## Contract
//!
//! - `upsert_one` / `upsert_batch` insert or replace `data` wholesale. A record
//!   keeps its `id` across overwrites; `created_at` is re-stamped on every
//!   write, so it means "last written" rather than "first created".
//! - A batch is applied in one transaction. When a key repeats in the batch the
//!   last occurrence wins, and the counts are per distinct key.
//! - `find_by_registration_no` trims the query and matches the whole key
//!   case-insensitively. When several stored keys differ only by case, the one
//!   equal to the trimmed query wins, otherwise the earliest inserted.
//!
//! - [`memory`] - In-process store for tests and dry runs
//! - [`sqlite`] - Durable SQLite store

pub mod memory;
pub mod sqlite;

#[cfg(test)]
pub mod tests;

pub use memory::MemoryCertificateStore;
pub use sqlite::SqliteCertificateStore;

use crate::app::models::{CertificateRecord, NewCertificate, RecordData};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome counts of a batch upsert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Distinct keys that were not stored before the batch
    pub inserted: usize,
    /// Distinct keys that already existed and were overwritten
    pub updated: usize,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Storage seam used by the ingestion pipeline and the CLI
pub trait CertificateStore: Send + Sync {
    /// Insert or replace the record for `registration_no`
    fn upsert_one(&self, registration_no: &str, data: RecordData) -> Result<CertificateRecord>;

    /// Insert or replace many records atomically
    fn upsert_batch(&self, records: Vec<NewCertificate>) -> Result<BatchSummary>;

    /// Case-insensitive, whole-key lookup of a trimmed query
    fn find_by_registration_no(&self, query: &str) -> Result<Option<CertificateRecord>>;

    fn find_by_id(&self, id: &str) -> Result<Option<CertificateRecord>>;

    /// Most recently written records first
    fn list_recent(&self, limit: usize) -> Result<Vec<CertificateRecord>>;

    fn count(&self) -> Result<usize>;
}

impl<S: CertificateStore + ?Sized> CertificateStore for Arc<S> {
    fn upsert_one(&self, registration_no: &str, data: RecordData) -> Result<CertificateRecord> {
        (**self).upsert_one(registration_no, data)
    }

    fn upsert_batch(&self, records: Vec<NewCertificate>) -> Result<BatchSummary> {
        (**self).upsert_batch(records)
    }

    fn find_by_registration_no(&self, query: &str) -> Result<Option<CertificateRecord>> {
        (**self).find_by_registration_no(query)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<CertificateRecord>> {
        (**self).find_by_id(id)
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<CertificateRecord>> {
        (**self).list_recent(limit)
    }

    fn count(&self) -> Result<usize> {
        (**self).count()
    }
}

impl<S: CertificateStore + ?Sized> CertificateStore for Box<S> {
    fn upsert_one(&self, registration_no: &str, data: RecordData) -> Result<CertificateRecord> {
        (**self).upsert_one(registration_no, data)
    }

    fn upsert_batch(&self, records: Vec<NewCertificate>) -> Result<BatchSummary> {
        (**self).upsert_batch(records)
    }

    fn find_by_registration_no(&self, query: &str) -> Result<Option<CertificateRecord>> {
        (**self).find_by_registration_no(query)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<CertificateRecord>> {
        (**self).find_by_id(id)
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<CertificateRecord>> {
        (**self).list_recent(limit)
    }

    fn count(&self) -> Result<usize> {
        (**self).count()
    }
}

/// Trim a write key, rejecting empty keys
pub fn storage_key(registration_no: &str) -> Result<String> {
    let key = registration_no.trim();
    if key.is_empty() {
        return Err(Error::data_validation(
            "Registration number must not be empty",
        ));
    }
    Ok(key.to_string())
}

/// Case-folded form used for lookups
pub fn lookup_key(registration_no: &str) -> String {
    registration_no.trim().to_lowercase()
}

/// Collapse a batch to one entry per key, last occurrence winning
///
/// Keys keep the position of their first occurrence. Every key is validated
/// before anything is written.
pub fn collapse_batch(records: Vec<NewCertificate>) -> Result<IndexMap<String, RecordData>> {
    let mut collapsed = IndexMap::with_capacity(records.len());
    for record in records {
        let key = storage_key(&record.registration_no)?;
        collapsed.insert(key, record.data);
    }
    Ok(collapsed)
}

/// Current time truncated to the microsecond precision both stores keep
pub fn write_timestamp() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now)
}

/// Fresh opaque record identifier
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

//! In-process certificate store
//!
//! Keeps records in insertion order behind a `RwLock`. Used by tests and by
//! `--in-memory` dry runs; contents vanish with the process.

use super::{
    BatchSummary, CertificateStore, collapse_batch, lookup_key, new_record_id, storage_key,
    write_timestamp,
};
use crate::app::models::{CertificateRecord, NewCertificate, RecordData};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct StoredEntry {
    record: CertificateRecord,
    /// Bumped on every write; breaks `created_at` ties in recency order
    revision: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Insertion order; never reordered on overwrite
    entries: Vec<StoredEntry>,
    by_key: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
    revision: u64,
}

impl MemoryState {
    /// Returns the entry index and whether a new record was inserted
    fn upsert(&mut self, key: String, data: RecordData, stamp: DateTime<Utc>) -> (usize, bool) {
        self.revision += 1;
        let revision = self.revision;

        if let Some(&index) = self.by_key.get(&key) {
            let entry = &mut self.entries[index];
            entry.record.data = data;
            entry.record.created_at = stamp;
            entry.revision = revision;
            return (index, false);
        }

        let record = CertificateRecord {
            id: new_record_id(),
            registration_no: key.clone(),
            data,
            created_at: stamp,
        };
        let index = self.entries.len();
        self.by_id.insert(record.id.clone(), index);
        self.by_key.insert(key, index);
        self.entries.push(StoredEntry { record, revision });
        (index, true)
    }
}

/// Certificate store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryCertificateStore {
    state: RwLock<MemoryState>,
}

impl MemoryCertificateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| Error::store("In-memory store lock poisoned", None))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| Error::store("In-memory store lock poisoned", None))
    }
}

impl CertificateStore for MemoryCertificateStore {
    fn upsert_one(&self, registration_no: &str, data: RecordData) -> Result<CertificateRecord> {
        let key = storage_key(registration_no)?;
        let mut state = self.write()?;

        let (index, inserted) = state.upsert(key, data, write_timestamp());
        let record = state.entries[index].record.clone();
        debug!(
            "{} certificate {}",
            if inserted { "Inserted" } else { "Updated" },
            record.registration_no
        );
        Ok(record)
    }

    fn upsert_batch(&self, records: Vec<NewCertificate>) -> Result<BatchSummary> {
        let collapsed = collapse_batch(records)?;
        let stamp = write_timestamp();
        let mut state = self.write()?;

        let mut summary = BatchSummary::new();
        for (key, data) in collapsed {
            if state.upsert(key, data, stamp).1 {
                summary.inserted += 1;
            } else {
                summary.updated += 1;
            }
        }

        debug!(
            "Batch upsert: {} inserted, {} updated",
            summary.inserted, summary.updated
        );
        Ok(summary)
    }

    fn find_by_registration_no(&self, query: &str) -> Result<Option<CertificateRecord>> {
        let exact = query.trim();
        if exact.is_empty() {
            return Ok(None);
        }
        let folded = lookup_key(exact);
        let state = self.read()?;

        let matches: Vec<&CertificateRecord> = state
            .entries
            .iter()
            .map(|entry| &entry.record)
            .filter(|record| record.registration_no.to_lowercase() == folded)
            .collect();

        if matches.len() > 1 {
            warn!(
                "Lookup '{}' matches {} registration numbers differing only by case",
                exact,
                matches.len()
            );
        }

        let chosen = matches
            .iter()
            .find(|record| record.registration_no == exact)
            .or_else(|| matches.first());
        Ok(chosen.map(|record| (*record).clone()))
    }

    fn find_by_id(&self, id: &str) -> Result<Option<CertificateRecord>> {
        let state = self.read()?;
        Ok(state
            .by_id
            .get(id.trim())
            .map(|&index| state.entries[index].record.clone()))
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<CertificateRecord>> {
        let state = self.read()?;
        let mut entries: Vec<&StoredEntry> = state.entries.iter().collect();
        entries.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then(b.revision.cmp(&a.revision))
        });

        Ok(entries
            .into_iter()
            .take(limit)
            .map(|entry| entry.record.clone())
            .collect())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.read()?.entries.len())
    }
}

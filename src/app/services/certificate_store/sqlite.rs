//! SQLite-backed certificate store
//!
//! A single connection behind `Arc<Mutex<_>>`. Batches run inside an
//! IMMEDIATE transaction so the write lock is taken up front and a batch is
//! either fully applied or not at all.

use super::{
    BatchSummary, CertificateStore, collapse_batch, lookup_key, new_record_id, storage_key,
    write_timestamp,
};
use crate::app::models::{CertificateRecord, NewCertificate, RecordData};
use crate::constants::DEFAULT_BUSY_TIMEOUT_MS;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS certificates (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    registration_no TEXT NOT NULL UNIQUE,
    registration_key TEXT NOT NULL,
    data TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    revision INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_certificates_registration_key
    ON certificates (registration_key);
CREATE INDEX IF NOT EXISTS idx_certificates_recent
    ON certificates (created_at, revision);
";

const SELECT_COLUMNS: &str = "SELECT id, registration_no, data, created_at FROM certificates";

/// Row as read from SQLite, before the payload is decoded
struct StoredRow {
    id: String,
    registration_no: String,
    data: String,
    created_at: i64,
}

impl StoredRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            registration_no: row.get(1)?,
            data: row.get(2)?,
            created_at: row.get(3)?,
        })
    }

    fn into_record(self) -> Result<CertificateRecord> {
        let data: RecordData = serde_json::from_str(&self.data).map_err(|e| {
            Error::serialization(
                format!("Stored payload for '{}' is not valid JSON", self.registration_no),
                e,
            )
        })?;
        let created_at = DateTime::<Utc>::from_timestamp_micros(self.created_at).ok_or_else(|| {
            Error::store(
                format!(
                    "Stored timestamp {} for '{}' is out of range",
                    self.created_at, self.registration_no
                ),
                None,
            )
        })?;

        Ok(CertificateRecord {
            id: self.id,
            registration_no: self.registration_no,
            data,
            created_at,
        })
    }
}

/// Durable certificate store
#[derive(Debug, Clone)]
pub struct SqliteCertificateStore {
    connection: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteCertificateStore {
    /// Open (creating if needed) the database at `path`
    pub fn open(path: &Path, busy_timeout_ms: u64) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::io(
                    format!("Failed to create database directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        let connection = Connection::open(path).map_err(|e| {
            Error::store(
                format!("Failed to open database: {}", path.display()),
                Some(e),
            )
        })?;
        apply_pragmas(&connection, busy_timeout_ms, true)?;
        initialize_schema(&connection)?;

        info!("Opened certificate database at {}", path.display());
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()
            .map_err(|e| Error::store("Failed to open in-memory database", Some(e)))?;
        apply_pragmas(&connection, DEFAULT_BUSY_TIMEOUT_MS, false)?;
        initialize_schema(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            path: None,
        })
    }

    /// Database file, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| Error::store("Database connection mutex poisoned", None))
    }
}

fn apply_pragmas(connection: &Connection, busy_timeout_ms: u64, durable: bool) -> Result<()> {
    if durable {
        connection.execute_batch("PRAGMA journal_mode = WAL;")?;
        connection.execute_batch("PRAGMA synchronous = NORMAL;")?;
    }
    connection.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
    Ok(())
}

fn initialize_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(SCHEMA)
        .map_err(|e| Error::store("Failed to initialize certificate schema", Some(e)))
}

fn begin_immediate(connection: &mut Connection) -> Result<Transaction<'_>> {
    connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| Error::store("Failed to begin write transaction", Some(e)))
}

fn next_revision(tx: &Transaction<'_>) -> Result<i64> {
    let current: i64 = tx.query_row(
        "SELECT COALESCE(MAX(revision), 0) FROM certificates",
        [],
        |row| row.get(0),
    )?;
    Ok(current + 1)
}

/// Upsert one collapsed entry; returns `true` when it was a new key
fn upsert_in(
    tx: &Transaction<'_>,
    key: &str,
    data: &RecordData,
    created_at: i64,
    revision: i64,
) -> Result<bool> {
    let existing: Option<String> = tx
        .query_row(
            "SELECT id FROM certificates WHERE registration_no = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;

    let payload = serde_json::to_string(data)
        .map_err(|e| Error::serialization(format!("Failed to encode payload for '{}'", key), e))?;

    tx.execute(
        "INSERT INTO certificates (id, registration_no, registration_key, data, created_at, revision) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
         ON CONFLICT(registration_no) DO UPDATE SET \
         registration_key = excluded.registration_key, data = excluded.data, \
         created_at = excluded.created_at, revision = excluded.revision",
        params![
            new_record_id(),
            key,
            lookup_key(key),
            payload,
            created_at,
            revision
        ],
    )
    .map_err(|e| Error::store(format!("Failed to upsert certificate '{}'", key), Some(e)))?;

    Ok(existing.is_none())
}

impl CertificateStore for SqliteCertificateStore {
    fn upsert_one(&self, registration_no: &str, data: RecordData) -> Result<CertificateRecord> {
        let key = storage_key(registration_no)?;
        let mut connection = self.lock()?;
        let tx = begin_immediate(&mut connection)?;

        let revision = next_revision(&tx)?;
        let inserted = upsert_in(&tx, &key, &data, write_timestamp().timestamp_micros(), revision)?;

        let stored = tx
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE registration_no = ?1"),
                params![key],
                StoredRow::from_row,
            )
            .map_err(|e| Error::store(format!("Failed to read back '{}'", key), Some(e)))?;
        tx.commit()
            .map_err(|e| Error::store("Failed to commit upsert", Some(e)))?;

        debug!(
            "{} certificate {}",
            if inserted { "Inserted" } else { "Updated" },
            key
        );
        stored.into_record()
    }

    fn upsert_batch(&self, records: Vec<NewCertificate>) -> Result<BatchSummary> {
        let collapsed = collapse_batch(records)?;
        let created_at = write_timestamp().timestamp_micros();

        let mut connection = self.lock()?;
        let tx = begin_immediate(&mut connection)?;
        let mut revision = next_revision(&tx)?;

        let mut summary = BatchSummary::new();
        for (key, data) in &collapsed {
            if upsert_in(&tx, key, data, created_at, revision)? {
                summary.inserted += 1;
            } else {
                summary.updated += 1;
            }
            revision += 1;
        }

        // dropping an uncommitted transaction rolls it back, so any `?` above
        // leaves the table untouched
        tx.commit()
            .map_err(|e| Error::store("Failed to commit certificate batch", Some(e)))?;

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

        let connection = self.lock()?;
        let mut statement = connection.prepare(&format!(
            "{SELECT_COLUMNS} WHERE registration_key = ?1 \
             ORDER BY (registration_no = ?2) DESC, seq ASC"
        ))?;
        let rows = statement
            .query_map(params![lookup_key(exact), exact], StoredRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if rows.len() > 1 {
            warn!(
                "Lookup '{}' matches {} registration numbers differing only by case",
                exact,
                rows.len()
            );
        }

        rows.into_iter().next().map(StoredRow::into_record).transpose()
    }

    fn find_by_id(&self, id: &str) -> Result<Option<CertificateRecord>> {
        let connection = self.lock()?;
        let stored = connection
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id.trim()],
                StoredRow::from_row,
            )
            .optional()?;
        stored.map(StoredRow::into_record).transpose()
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<CertificateRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let connection = self.lock()?;
        let mut statement = connection.prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, revision DESC LIMIT ?1"
        ))?;
        let rows = statement
            .query_map(params![limit], StoredRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(StoredRow::into_record).collect()
    }

    fn count(&self) -> Result<usize> {
        let connection = self.lock()?;
        let count: i64 = connection.query_row("SELECT COUNT(*) FROM certificates", [], |row| {
            row.get(0)
        })?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

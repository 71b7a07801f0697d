//! Application constants for the certificate registry
//!
//! This module contains configuration defaults, well-known field names,
//! and the header patterns used throughout the ingestion pipeline.

// =============================================================================
// File Intake
// =============================================================================

/// Default upload size ceiling (10 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// File extensions accepted by default at intake
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

/// Every extension the tabular parser can decode
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "tsv", "xlsx", "xlsm", "xlsb", "xls", "ods"];

// =============================================================================
// Storage & Archive
// =============================================================================

/// Default SQLite database file name
pub const DEFAULT_DATABASE_FILE: &str = "certificates.sqlite";

/// Default directory for archived uploads
pub const DEFAULT_ARCHIVE_DIR: &str = "backups";

/// Default SQLite busy timeout in milliseconds
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Default number of records shown by `list`
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Application directory name under the user config directory
pub const APP_DIR_NAME: &str = "cert-registry";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overrides
pub mod env_vars {
    pub const DATABASE: &str = "CERT_REGISTRY_DATABASE";
    pub const ARCHIVE_DIR: &str = "CERT_REGISTRY_ARCHIVE_DIR";
    pub const MAX_FILE_BYTES: &str = "CERT_REGISTRY_MAX_FILE_BYTES";
}

// =============================================================================
// Record Shape
// =============================================================================

/// Canonical mapping target holding the registration number
pub const REGISTRATION_FIELD: &str = "registrationNo";

/// Key under which mapped records keep their source row
pub const ORIGINAL_ROW_KEY: &str = "_original";

/// Prefix of the synthetic registration number used when no column exists
pub const SYNTHETIC_ID_PREFIX: &str = "ROW_";

/// Offset from a 0-based data row index to its 1-based sheet row (header is row 1)
pub const HEADER_ROW_OFFSET: usize = 2;

/// Reason recorded for rows without a usable registration number
pub const MISSING_REGISTRATION_REASON: &str = "Missing registration number";

/// Reason recorded when a mapping has no registration number entry
pub const UNMAPPED_REGISTRATION_REASON: &str = "Registration number column mapping is required";

// =============================================================================
// Header Normalization
// =============================================================================

/// Placeholder name given to blank header cells
pub const EMPTY_HEADER_NAME: &str = "__EMPTY";

// =============================================================================
// Registration Column Detection
// =============================================================================

/// Case-insensitive header patterns, highest priority first
pub const REGISTRATION_PATTERNS: &[&str] = &[
    r"(?i)^\s*registration[\s._-]*no\.?\s*$",
    r"(?i)registration.?no",
    r"(?i)reg.?no",
    r"(?i)registration",
    r"(?i)reg.?number",
];

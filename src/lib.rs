//! Certificate Registry Library
//!
//! A Rust library for ingesting spreadsheets of certificate records and
//! serving registration-number lookups over the stored results.
//!
//! This library provides tools for:
//! - Parsing uploaded CSV/TSV files and Excel/ODS workbooks into header-keyed rows
//! - Detecting the registration-number column, or applying an explicit column mapping
//! - Normalizing rows into certificate records with per-row error reporting
//! - Upserting records into SQLite (or in-memory) storage keyed by registration number
//! - Case-insensitive lookups and extraction of well-known certificate fields
//! - Archiving every successfully imported source file

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod certificate_store;
        pub mod certificate_view;
        pub mod column_resolver;
        pub mod ingestion;
        pub mod record_normalizer;
        pub mod tabular_parser;
    }
    pub mod adapters {
        pub mod filesystem;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{CertificateRecord, FieldValue, RawRow, RecordData};
pub use config::Config;

/// Result type alias for the certificate registry
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for certificate ingestion and storage operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Uploaded bytes could not be decoded in the declared format
    #[error("Failed to parse {format} file: {message}")]
    Parse { format: String, message: String },

    /// CSV decoding error
    #[error("CSV parsing error: {message}")]
    CsvParsing {
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Workbook container could not be opened or read
    #[error("Workbook error in {format} file: {message}")]
    Workbook { format: String, message: String },

    /// Declared format is not one the parser understands
    #[error("Unsupported file format: '{hint}'")]
    UnsupportedFormat { hint: String },

    /// Upload exceeds the configured size ceiling
    #[error("File '{file}' is {size} bytes, exceeding the {limit} byte limit")]
    FileTooLarge { file: String, size: u64, limit: u64 },

    /// Underlying record storage failed
    #[error("Store error: {message}")]
    Store {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// Record payload could not be (de)serialized
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Requested record does not exist
    #[error("No record found for {key}")]
    RecordNotFound { key: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a parse error for the given format
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(message: impl Into<String>, source: Option<csv::Error>) -> Self {
        Self::CsvParsing {
            message: message.into(),
            source,
        }
    }

    /// Create a workbook error
    pub fn workbook(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Workbook {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(hint: impl Into<String>) -> Self {
        Self::UnsupportedFormat { hint: hint.into() }
    }

    /// Create a file too large error
    pub fn file_too_large(file: impl Into<String>, size: u64, limit: u64) -> Self {
        Self::FileTooLarge {
            file: file.into(),
            size,
            limit,
        }
    }

    /// Create a store error with an optional SQLite source
    pub fn store(message: impl Into<String>, source: Option<rusqlite::Error>) -> Self {
        Self::Store {
            message: message.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a record not found error
    pub fn record_not_found(key: impl Into<String>) -> Self {
        Self::RecordNotFound { key: key.into() }
    }

    /// Whether this error means the uploaded file itself was unreadable
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::CsvParsing { .. } | Self::Workbook { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::Store {
            message: "SQLite operation failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON conversion failed".to_string(),
            source: error,
        }
    }
}

//! File system intake for uploads
//!
//! Applies the intake rules (allowed extension, size ceiling) before any bytes
//! reach the tabular parser.

use crate::app::services::ingestion::Upload;
use crate::app::services::tabular_parser::SheetFormat;
use crate::config::IntakeConfig;
use crate::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Read an upload from disk, enforcing the intake rules
pub fn read_upload(path: &Path, intake: &IntakeConfig) -> Result<Upload> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::data_validation(format!("Not a file path: {}", path.display()))
        })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    if !intake.allows(extension) {
        return Err(Error::unsupported_format(format!(
            "{} (allowed: {})",
            file_name,
            intake.allowed_extensions.join(", ")
        )));
    }
    let format = SheetFormat::from_hint(extension)?;

    let metadata = std::fs::metadata(path)
        .map_err(|e| Error::io(format!("Failed to read file: {}", path.display()), e))?;
    if !metadata.is_file() {
        return Err(Error::data_validation(format!(
            "Not a regular file: {}",
            path.display()
        )));
    }
    if metadata.len() > intake.max_file_bytes {
        return Err(Error::file_too_large(
            file_name,
            metadata.len(),
            intake.max_file_bytes,
        ));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| Error::io(format!("Failed to read file: {}", path.display()), e))?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    Ok(Upload::new(file_name, format, bytes))
}

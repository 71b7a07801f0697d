//! Archival of successfully ingested uploads
//!
//! Each upload is written once as `<unix-millis>_<file name>`. Names are never
//! reused: on collision a `_1`, `_2`, ... suffix is inserted before the
//! extension.

use crate::{Error, Result};
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Upper bound on suffix attempts before giving up
const MAX_NAME_ATTEMPTS: usize = 1_000;

/// Writes upload copies into a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archiver {
    directory: PathBuf,
}

impl Archiver {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Store `bytes` under a fresh timestamped name and return its path
    pub fn archive(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.directory).map_err(|e| {
            Error::io(
                format!(
                    "Failed to create archive directory: {}",
                    self.directory.display()
                ),
                e,
            )
        })?;

        let base = format!("{}_{}", Utc::now().timestamp_millis(), sanitize_file_name(file_name));

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = self.directory.join(suffixed_name(&base, attempt));
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(file) => {
                    write_or_remove(file, &candidate, bytes)?;
                    debug!("Archived {} bytes to {}", bytes.len(), candidate.display());
                    return Ok(candidate);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(Error::io(
                        format!("Failed to create archive: {}", candidate.display()),
                        e,
                    ));
                }
            }
        }

        Err(Error::io(
            format!("No free archive name for '{}'", base),
            std::io::Error::from(ErrorKind::AlreadyExists),
        ))
    }
}

/// Write `bytes` to a freshly created file, deleting it if the write fails
fn write_or_remove<W: Write>(mut writer: W, path: &Path, bytes: &[u8]) -> Result<()> {
    let written = writer.write_all(bytes).and_then(|()| writer.flush());
    drop(writer);

    if let Err(e) = written {
        if let Err(remove_err) = std::fs::remove_file(path) {
            warn!(
                "Could not remove partial archive {}: {}",
                path.display(),
                remove_err
            );
        }
        return Err(Error::io(
            format!("Failed to write archive: {}", path.display()),
            e,
        ));
    }
    Ok(())
}

/// Keep only the final path component of an uploaded name
pub fn sanitize_file_name(file_name: &str) -> String {
    let last = file_name
        .rsplit(['/', '\\'])
        .find(|part| !part.trim().is_empty())
        .unwrap_or("")
        .trim();

    if last.is_empty() || last == "." || last == ".." {
        "upload".to_string()
    } else {
        last.to_string()
    }
}

fn suffixed_name(base: &str, attempt: usize) -> String {
    if attempt == 0 {
        return base.to_string();
    }
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{attempt}.{ext}"),
        _ => format!("{base}_{attempt}"),
    }
}

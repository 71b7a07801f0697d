//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `CERT_REGISTRY_*` environment variables, then command-line flags (applied
//! by the CLI through the `with_*` builders).
//!
//! ```toml
//! [storage]
//! database_path = "/var/lib/cert-registry/certificates.sqlite"
//! busy_timeout_ms = 5000
//!
//! [archive]
//! enabled = true
//! directory = "/var/lib/cert-registry/backups"
//!
//! [intake]
//! max_file_bytes = 10485760
//! allowed_extensions = ["csv", "xlsx", "xls"]
//! ```

use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_ARCHIVE_DIR,
    DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DATABASE_FILE, DEFAULT_MAX_FILE_BYTES, SUPPORTED_EXTENSIONS,
    env_vars,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Certificate database settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// How long a writer waits for the SQLite lock
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Upload archival settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub enabled: bool,

    /// Directory receiving `<unix-millis>_<file name>` copies
    pub directory: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from(DEFAULT_ARCHIVE_DIR),
        }
    }
}

/// Upload acceptance rules applied before parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Largest accepted upload in bytes
    pub max_file_bytes: u64,

    /// Lower-case extensions accepted at intake
    pub allowed_extensions: Vec<String>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl IntakeConfig {
    /// Whether `extension` (with or without a leading dot) is accepted
    pub fn allows(&self, extension: &str) -> bool {
        let extension = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&extension))
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub archive: ArchiveConfig,
    pub intake: IntakeConfig,
}

impl Config {
    /// Parse a TOML document; missing sections and keys take defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Invalid configuration: {}", e)))
    }

    /// Read a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read configuration file: {}", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Configuration { message } => {
                Error::configuration(format!("{} ({})", message, path.display()))
            }
            other => other,
        })
    }

    /// Default configuration file location, e.g. `~/.config/cert-registry/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load defaults, then the config file, then environment overrides
    ///
    /// An explicit `path` must exist. Without one, the default location is used
    /// only if a file is present there.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(default) => {
                    debug!("Loading configuration from {}", default.display());
                    Self::from_file(&default)?
                }
                None => {
                    debug!("No configuration file, using defaults");
                    Self::default()
                }
            },
        };

        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `CERT_REGISTRY_*` overrides read through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(database) = lookup(env_vars::DATABASE).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides database path", env_vars::DATABASE);
            self.storage.database_path = PathBuf::from(database);
        }

        if let Some(directory) = lookup(env_vars::ARCHIVE_DIR).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides archive directory", env_vars::ARCHIVE_DIR);
            self.archive.directory = PathBuf::from(directory);
        }

        if let Some(limit) = lookup(env_vars::MAX_FILE_BYTES) {
            self.intake.max_file_bytes = limit.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{} must be a byte count, got '{}'",
                    env_vars::MAX_FILE_BYTES,
                    limit
                ))
            })?;
        }

        Ok(self)
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.database_path = path.into();
        self
    }

    pub fn with_archive_dir(mut self, directory: impl Into<PathBuf>) -> Self {
        self.archive.directory = directory.into();
        self
    }

    pub fn without_archive(mut self) -> Self {
        self.archive.enabled = false;
        self
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_path.as_os_str().is_empty() {
            return Err(Error::configuration("storage.database_path must not be empty"));
        }

        if self.intake.max_file_bytes == 0 {
            return Err(Error::configuration(
                "intake.max_file_bytes must be greater than 0",
            ));
        }

        if self.intake.allowed_extensions.is_empty() {
            return Err(Error::configuration(
                "intake.allowed_extensions must list at least one extension",
            ));
        }

        for extension in &self.intake.allowed_extensions {
            let normalized = extension.trim_start_matches('.').to_ascii_lowercase();
            if !SUPPORTED_EXTENSIONS.contains(&normalized.as_str()) {
                return Err(Error::configuration(format!(
                    "intake.allowed_extensions contains '{}'; supported: {}",
                    extension,
                    SUPPORTED_EXTENSIONS.join(", ")
                )));
            }
        }

        if self.archive.enabled && self.archive.directory.as_os_str().is_empty() {
            return Err(Error::configuration(
                "archive.directory must not be empty while archiving is enabled",
            ));
        }

        Ok(())
    }
}

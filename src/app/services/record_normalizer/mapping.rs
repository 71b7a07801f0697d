//! Explicit column mapping supplied by an administrator
//!
//! Maps canonical target fields (`registrationNo`, `studentName`, ...) to the
//! source header holding their value. Entry order is preserved and becomes
//! the key order of the mapped record payload.

use crate::constants::REGISTRATION_FIELD;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ordered target field to source header mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: IndexMap<String, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `target` to `source`, replacing any earlier source for that target
    pub fn insert(&mut self, target: impl Into<String>, source: impl Into<String>) {
        self.entries.insert(target.into(), source.into());
    }

    /// Builder form of [`ColumnMapping::insert`]
    pub fn with(mut self, target: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(target, source);
        self
    }

    pub fn source_for(&self, target: &str) -> Option<&str> {
        self.entries.get(target).map(String::as_str)
    }

    /// Source header for the registration number, when mapped
    pub fn registration_source(&self) -> Option<&str> {
        self.source_for(REGISTRATION_FIELD)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, s)| (t.as_str(), s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON object such as `{"registrationNo": "Roll", "studentName": "Name"}`
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::serialization("Column mapping must be a JSON object of strings", e))
    }

    /// Load a JSON mapping file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read column mapping file: {}", path.display()),
                e,
            )
        })?;
        Self::from_json(&content)
    }

    /// Parse command-line `field=Header` pairs; the header may contain `=`
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mapping = Self::new();
        for pair in pairs {
            let (target, source) = parse_pair(pair.as_ref())?;
            mapping.insert(target, source);
        }
        Ok(mapping)
    }

    /// Overlay `other` on top of this mapping; its entries win
    pub fn merge(&mut self, other: ColumnMapping) {
        for (target, source) in other.entries {
            self.entries.insert(target, source);
        }
    }
}

/// Split a `field=Header` pair at the first `=`
pub fn parse_pair(pair: &str) -> Result<(String, String)> {
    let (target, source) = pair.split_once('=').ok_or_else(|| {
        Error::data_validation(format!(
            "Invalid column mapping '{}': expected field=Header",
            pair
        ))
    })?;

    let target = target.trim();
    if target.is_empty() {
        return Err(Error::data_validation(format!(
            "Invalid column mapping '{}': target field is empty",
            pair
        )));
    }

    Ok((target.to_string(), source.trim().to_string()))
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColumnMapping {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

//! Header row normalization and row assembly shared by every dialect
//!
//! Header cells are trimmed, blank headers become `__EMPTY`, `__EMPTY_1`, ...
//! and repeated headers get `_1`, `_2`, ... suffixes so the header set is unique.

use super::ParsedSheet;
use crate::app::models::RawRow;
use crate::constants::EMPTY_HEADER_NAME;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Turn raw header cells into a unique, ordered header set
pub fn normalize_headers<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::with_capacity(raw.len());

    for cell in raw {
        let trimmed = cell.as_ref().trim();
        let base = if trimmed.is_empty() {
            EMPTY_HEADER_NAME.to_string()
        } else {
            trimmed.to_string()
        };

        let name = if used.contains(&base) {
            let counter = next_suffix.entry(base.clone()).or_insert(1);
            loop {
                let candidate = format!("{}_{}", base, counter);
                *counter += 1;
                if !used.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            base
        };

        used.insert(name.clone());
        headers.push(name);
    }

    headers
}

/// Build a parsed sheet from a header record followed by data records
///
/// Fully blank data rows are dropped; short records are padded with empty cells
/// and cells beyond the last header are ignored.
pub fn assemble<I>(raw_headers: Vec<String>, records: I) -> ParsedSheet
where
    I: IntoIterator<Item = Vec<String>>,
{
    let headers = normalize_headers(&raw_headers);
    let mut rows = Vec::new();
    let mut blank_rows = 0usize;

    for (index, record) in records.into_iter().enumerate() {
        if record.len() > headers.len() && record[headers.len()..].iter().any(|c| !c.is_empty()) {
            debug!(
                "Data record {} has {} cells but only {} headers; extra cells ignored",
                index + 1,
                record.len(),
                headers.len()
            );
        }

        let row = RawRow::from_cells(&headers, record);
        if row.is_blank() {
            blank_rows += 1;
            continue;
        }
        rows.push(row);
    }

    if blank_rows > 0 {
        debug!("Skipped {} blank rows", blank_rows);
    }

    ParsedSheet { headers, rows }
}

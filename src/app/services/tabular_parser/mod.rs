//! Tabular parser for uploaded certificate spreadsheets
//!
//! Turns uploaded bytes plus a declared format into an ordered header set and
//! header-keyed rows. The dialect is always taken from the declared format;
//! file content is never sniffed.
//!
//! ## Architecture
//!
//! - [`format`] - Declared formats and extension-hint selection
//! - [`delimited`] - CSV/TSV decoding on top of the `csv` crate
//! - [`workbook`] - XLSX/XLSM/XLSB/XLS/ODS decoding on top of `calamine`
//! - [`headers`] - Header normalization and row assembly shared by both
//!
//! ## Usage
//!
//! ```rust
//! use cert_registry::app::services::tabular_parser::{parse, SheetFormat};
//!
//! # fn example() -> cert_registry::Result<()> {
//! let sheet = parse(b"Name,Reg No\nA,X1\n", SheetFormat::Csv)?;
//! assert_eq!(sheet.headers, vec!["Name", "Reg No"]);
//! assert_eq!(sheet.rows[0].get("Reg No"), Some("X1"));
//! # Ok(())
//! # }
//! ```

pub mod delimited;
pub mod format;
pub mod headers;
pub mod workbook;

#[cfg(test)]
pub mod tests;

pub use format::SheetFormat;

use crate::Result;
use crate::app::models::RawRow;
use tracing::debug;

/// Result of parsing one sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSheet {
    /// Unique header names from row 1, in column order
    pub headers: Vec<String>,
    /// Non-blank data rows, keyed by header
    pub rows: Vec<RawRow>,
}

/// Parse uploaded bytes in the declared format
pub fn parse(bytes: &[u8], format: SheetFormat) -> Result<ParsedSheet> {
    debug!("Parsing {} bytes as {}", bytes.len(), format);

    let sheet = if format.is_delimited() {
        delimited::parse_delimited(bytes, format)?
    } else {
        workbook::parse_workbook(bytes, format)?
    };

    debug!(
        "Parsed {} headers and {} rows",
        sheet.headers.len(),
        sheet.rows.len()
    );
    Ok(sheet)
}

/// Parse uploaded bytes using an extension hint such as `"xlsx"` or `"marks.csv"`
pub fn parse_with_hint(bytes: &[u8], hint: &str) -> Result<ParsedSheet> {
    parse(bytes, SheetFormat::from_hint(hint)?)
}

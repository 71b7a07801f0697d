//! Declared sheet formats and their selection from file-extension hints

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Spreadsheet dialects the parser can decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetFormat {
    /// Comma-separated text
    Csv,
    /// Tab-separated text
    Tsv,
    /// Office Open XML workbook
    Xlsx,
    /// Macro-enabled Office Open XML workbook
    Xlsm,
    /// Binary Office Open XML workbook
    Xlsb,
    /// Legacy BIFF workbook
    Xls,
    /// OpenDocument spreadsheet
    Ods,
}

impl SheetFormat {
    /// Select a format from an extension hint such as `csv`, `.XLSX` or `report.xls`
    ///
    /// The hint is never compared against file content.
    pub fn from_hint(hint: &str) -> Result<Self> {
        let trimmed = hint.trim();
        let extension = Path::new(trimmed)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_else(|| trimmed.trim_start_matches('.'));

        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(SheetFormat::Csv),
            "tsv" | "tab" => Ok(SheetFormat::Tsv),
            "xlsx" => Ok(SheetFormat::Xlsx),
            "xlsm" => Ok(SheetFormat::Xlsm),
            "xlsb" => Ok(SheetFormat::Xlsb),
            "xls" => Ok(SheetFormat::Xls),
            "ods" => Ok(SheetFormat::Ods),
            _ => Err(Error::unsupported_format(hint)),
        }
    }

    /// Field delimiter for text dialects, `None` for workbooks
    pub fn delimiter(&self) -> Option<u8> {
        match self {
            SheetFormat::Csv => Some(b','),
            SheetFormat::Tsv => Some(b'\t'),
            _ => None,
        }
    }

    pub fn is_delimited(&self) -> bool {
        self.delimiter().is_some()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SheetFormat::Csv => "csv",
            SheetFormat::Tsv => "tsv",
            SheetFormat::Xlsx => "xlsx",
            SheetFormat::Xlsm => "xlsm",
            SheetFormat::Xlsb => "xlsb",
            SheetFormat::Xls => "xls",
            SheetFormat::Ods => "ods",
        }
    }
}

impl fmt::Display for SheetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

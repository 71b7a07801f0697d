//! Delimited text (CSV/TSV) decoding

use super::ParsedSheet;
use super::format::SheetFormat;
use super::headers::assemble;
use crate::{Error, Result};
use tracing::debug;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode UTF-8 delimited text; the first record is the header row
pub fn parse_delimited(bytes: &[u8], format: SheetFormat) -> Result<ParsedSheet> {
    let delimiter = format
        .delimiter()
        .ok_or_else(|| Error::parse(format.to_string(), "format is not a delimited dialect"))?;

    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|e| {
        Error::parse(
            format.to_string(),
            format!("content is not valid UTF-8 (byte offset {})", e.valid_up_to()),
        )
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut records = reader.records();

    let raw_headers: Vec<String> = match records.next() {
        Some(header) => header
            .map_err(|e| Error::csv_parsing("Failed to read header row", Some(e)))?
            .iter()
            .map(str::to_string)
            .collect(),
        None => {
            debug!("Empty {} input, no header row", format);
            return Ok(ParsedSheet::default());
        }
    };

    let mut data = Vec::new();
    for (index, record) in records.enumerate() {
        let record = record.map_err(|e| {
            Error::csv_parsing(format!("Failed to read data record {}", index + 1), Some(e))
        })?;
        data.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    Ok(assemble(raw_headers, data))
}

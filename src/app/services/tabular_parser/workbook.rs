//! Binary workbook (XLSX/XLSM/XLSB/XLS/ODS) decoding via calamine
//!
//! Only the first worksheet is read. Cells are rendered as formatted text so the
//! rest of the pipeline sees the same strings a spreadsheet user would.

use super::ParsedSheet;
use super::format::SheetFormat;
use super::headers::assemble;
use crate::{Error, Result};
use calamine::{Data, DataType, Ods, Range, Reader, Xls, Xlsb, Xlsx};
use chrono::{NaiveDateTime, NaiveTime};
use std::fmt;
use std::io::Cursor;
use tracing::debug;

/// Decode the first worksheet of a workbook
pub fn parse_workbook(bytes: &[u8], format: SheetFormat) -> Result<ParsedSheet> {
    let range = match format {
        SheetFormat::Xlsx | SheetFormat::Xlsm => first_sheet::<Xlsx<_>>(bytes, format)?,
        SheetFormat::Xlsb => first_sheet::<Xlsb<_>>(bytes, format)?,
        SheetFormat::Xls => first_sheet::<Xls<_>>(bytes, format)?,
        SheetFormat::Ods => first_sheet::<Ods<_>>(bytes, format)?,
        SheetFormat::Csv | SheetFormat::Tsv => {
            return Err(Error::parse(
                format.to_string(),
                "format is not a workbook dialect",
            ));
        }
    };

    let Some(range) = range else {
        debug!("{} workbook has no worksheets", format);
        return Ok(ParsedSheet::default());
    };

    let mut rows = range.rows();
    let raw_headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(cell_to_text).collect(),
        None => return Ok(ParsedSheet::default()),
    };

    let data: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_to_text).collect())
        .collect();

    Ok(assemble(raw_headers, data))
}

fn first_sheet<'a, R>(bytes: &'a [u8], format: SheetFormat) -> Result<Option<Range<Data>>>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: fmt::Display,
{
    let mut workbook =
        R::new(Cursor::new(bytes)).map_err(|e| Error::workbook(format.to_string(), e.to_string()))?;

    match workbook.worksheet_range_at(0) {
        None => Ok(None),
        Some(Ok(range)) => Ok(Some(range)),
        Some(Err(e)) => Err(Error::workbook(format.to_string(), e.to_string())),
    }
}

/// Render a cell the way it reads in a spreadsheet
pub fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) => format_datetime(dt),
            None => cell.to_string(),
        },
        other => other.to_string(),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

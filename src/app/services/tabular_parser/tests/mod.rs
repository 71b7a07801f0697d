//! Test utilities for tabular parser testing
//!
//! Workbook fixtures are generated in memory with `rust_xlsxwriter` so the
//! binary dialect is exercised without checked-in spreadsheets.

use rust_xlsxwriter::Workbook;


/// A cell written into a generated workbook
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

/// Helper to build an XLSX workbook whose first sheet holds `rows`
pub fn build_xlsx(rows: &[Vec<Cell<'_>>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(r, c, *text).unwrap();
                }
                Cell::Number(value) => {
                    worksheet.write_number(r, c, *value).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// Helper to build a workbook of text cells only
pub fn build_text_xlsx(rows: &[&[&str]]) -> Vec<u8> {
    let rows: Vec<Vec<Cell<'_>>> = rows
        .iter()
        .map(|row| row.iter().map(|text| Cell::Text(*text)).collect())
        .collect();
    build_xlsx(&rows)
}

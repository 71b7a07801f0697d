//! Test utilities for record normalizer testing

use crate::app::models::RawRow;

// Test modules
mod mapping_tests;
mod normalizer_tests;

/// Helper to build a row from `(header, value)` pairs
pub fn row(cells: &[(&str, &str)]) -> RawRow {
    cells.iter().map(|(h, v)| (*h, *v)).collect()
}

/// The canonical three-column sample row
pub fn sample_row() -> RawRow {
    row(&[("Name", "A"), ("Reg No", "X1"), ("Grade", "B+")])
}

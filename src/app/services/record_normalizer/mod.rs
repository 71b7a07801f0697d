//! Record normalizer for parsed spreadsheet rows
//!
//! Converts header-keyed rows into `{registrationNo, data}` pairs ready for
//! the certificate store. Rows that cannot yield a registration number are
//! reported as `{row, error}` with the 1-based sheet row (header = row 1) and
//! never abort the batch.
//!
//! - [`mapping`] - Explicit target field to source header mapping
//! - [`normalizer`] - Auto and mapped normalization

pub mod mapping;
pub mod normalizer;

#[cfg(test)]
pub mod tests;

pub use mapping::ColumnMapping;
pub use normalizer::{NormalizeMode, NormalizedBatch, normalize_row, normalize_rows};

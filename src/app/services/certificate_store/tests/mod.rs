//! Test utilities for certificate store testing
//!
//! The store contract is written once in [`contract_tests`] as generic
//! functions and run against every implementation.

use crate::app::models::{FieldValue, NewCertificate, RecordData};


/// Helper to build a text payload from `(field, value)` pairs
pub fn data(fields: &[(&str, &str)]) -> RecordData {
    fields
        .iter()
        .map(|(k, v)| (*k, FieldValue::from(*v)))
        .collect()
}

/// Helper to build a batch entry
pub fn cert(registration_no: &str, fields: &[(&str, &str)]) -> NewCertificate {
    NewCertificate::new(registration_no, data(fields))
}

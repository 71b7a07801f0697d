//! Lookup and show command implementations

use super::shared::{load_configuration, open_store, print_json};
use crate::app::models::CertificateRecord;
use crate::app::services::certificate_store::CertificateStore;
use crate::app::services::certificate_view::{CertificateView, field_label};
use crate::cli::args::{GlobalArgs, LookupArgs, ShowArgs};
use crate::{Error, Result};
use colored::*;
use serde_json::json;

/// Run the lookup command
pub fn run_lookup(global: &GlobalArgs, args: &LookupArgs) -> Result<CertificateRecord> {
    let query = args.registration_no.trim();
    if query.is_empty() {
        return Err(Error::data_validation("Registration number is required"));
    }

    let config = load_configuration(global)?;
    let store = open_store(global, &config)?;
    let record = store
        .find_by_registration_no(query)?
        .ok_or_else(|| Error::record_not_found(format!("registration number '{}'", query)))?;

    print_record(&record, args.json)?;
    Ok(record)
}

/// Run the show command
pub fn run_show(global: &GlobalArgs, args: &ShowArgs) -> Result<CertificateRecord> {
    let config = load_configuration(global)?;
    let store = open_store(global, &config)?;
    let record = store
        .find_by_id(&args.id)?
        .ok_or_else(|| Error::record_not_found(format!("id '{}'", args.id.trim())))?;

    print_record(&record, args.json)?;
    Ok(record)
}

fn print_record(record: &CertificateRecord, as_json: bool) -> Result<()> {
    let view = CertificateView::from_record(record);

    if as_json {
        return print_json(&json!({ "record": record, "view": view }));
    }

    println!("{}", "Certificate".bright_green().bold());
    println!("  {:<18} {}", "Id:".bright_cyan(), record.id);
    println!(
        "  {:<18} {}",
        "Written:".bright_cyan(),
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    for (label, value) in view.known_fields() {
        println!(
            "  {:<18} {}",
            format!("{}:", label).bright_cyan(),
            value.bright_white()
        );
    }

    if !view.additional_fields.is_empty() {
        println!("{}", "Additional information".bright_green());
        for (key, value) in &view.additional_fields {
            println!("  {:<18} {}", format!("{}:", field_label(key)), value);
        }
    }
    Ok(())
}

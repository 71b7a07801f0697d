//! List command implementation

use super::shared::{load_configuration, open_store, print_json, record_summary_line};
use crate::Result;
use crate::app::models::CertificateRecord;
use crate::app::services::certificate_store::CertificateStore;
use crate::cli::args::{GlobalArgs, ListArgs};
use colored::*;
use serde_json::json;

/// Run the list command
pub fn run_list(global: &GlobalArgs, args: &ListArgs) -> Result<Vec<CertificateRecord>> {
    let config = load_configuration(global)?;
    let store = open_store(global, &config)?;

    let total = store.count()?;
    let records = store.list_recent(args.limit)?;

    if args.json {
        print_json(&json!({ "total": total, "records": records }))?;
        return Ok(records);
    }

    println!(
        "{} {} of {} certificates",
        "Showing".bright_green().bold(),
        records.len(),
        total
    );
    for record in &records {
        println!("  {}", record_summary_line(record));
    }

    Ok(records)
}

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::types::{Bill, BillAction};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

const HEADER: [&str; 12] = [
    "bill_number",
    "title",
    "status",
    "sponsor",
    "url",
    "scraped_at",
    "committees",
    "actions",
    "cosponsors",
    "last_action_date",
    "introduced_date",
    "enriched_at",
];

fn flatten_actions(actions: &[BillAction]) -> String {
    actions
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Writes one row per bill; list-valued fields are joined with "; ".
pub fn write_csv<W: Write>(bills: &[Bill], writer: W) -> Result<(), ExportError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(HEADER)?;

    for bill in bills {
        w.write_record([
            bill.bill_number.clone(),
            bill.title.clone(),
            bill.status.clone(),
            bill.sponsor.clone(),
            bill.url.clone(),
            bill.scraped_at.to_rfc3339(),
            bill.committees.join("; "),
            flatten_actions(&bill.actions),
            bill.cosponsors.join("; "),
            bill.last_action_date.clone().unwrap_or_default(),
            bill.introduced_date.clone().unwrap_or_default(),
            bill.enriched_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ])?;
    }

    w.flush()?;
    Ok(())
}

pub fn save_to_csv(bills: &[Bill], path: impl AsRef<Path>) -> Result<(), ExportError> {
    let file = File::create(path.as_ref())?;
    write_csv(bills, file)?;
    log::info!(
        "Saved {} bill(s) to {}",
        bills.len(),
        path.as_ref().display()
    );
    Ok(())
}

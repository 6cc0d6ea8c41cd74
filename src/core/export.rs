//! History export: CSV and JSON dumps of the time entry listing.

use clap::ValueEnum;
use std::fs::File;
use std::path::Path;

use crate::errors::{AppError, AppResult};
use crate::models::time_entry::TimeEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

pub fn export_entries(
    path: &str,
    format: ExportFormat,
    entries: &[TimeEntry],
    force: bool,
) -> AppResult<()> {
    if Path::new(path).exists() && !force {
        return Err(AppError::Export(format!(
            "{} already exists (use --force to overwrite)",
            path
        )));
    }

    match format {
        ExportFormat::Csv => write_csv(path, entries),
        ExportFormat::Json => write_json(path, entries),
    }
}

fn write_csv(path: &str, entries: &[TimeEntry]) -> AppResult<()> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| AppError::Export(e.to_string()))?;

    wtr.write_record([
        "date", "start", "end", "minutes", "status", "locked", "property", "category", "notes",
    ])
    .map_err(|e| AppError::Export(e.to_string()))?;

    for entry in entries {
        wtr.write_record(&[
            entry.entry_date.format("%Y-%m-%d").to_string(),
            entry.started_at.to_rfc3339(),
            entry.ended_at.to_rfc3339(),
            entry.duration_minutes.to_string(),
            entry.status.as_str().to_string(),
            if entry.locked { "yes" } else { "no" }.to_string(),
            entry.property_name.clone().unwrap_or_default(),
            entry.billing_category_name.clone().unwrap_or_default(),
            entry.notes.clone().unwrap_or_default(),
        ])
        .map_err(|e| AppError::Export(e.to_string()))?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_json(path: &str, entries: &[TimeEntry]) -> AppResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, entries).map_err(|e| AppError::Export(e.to_string()))?;
    Ok(())
}

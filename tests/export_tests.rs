//! CSV/JSON export of the history listing.

mod common;
use common::temp_out;

use chrono::{NaiveDate, TimeZone, Utc};
use std::fs;
use uuid::Uuid;

use crewclock::core::export::{ExportFormat, export_entries};
use crewclock::errors::AppError;
use crewclock::models::time_entry::{EntryStatus, TimeEntry};
use crewclock::utils::time::duration_minutes;

fn sample_entry(notes: &str) -> TimeEntry {
    let started_at = Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap();
    let ended_at = Utc.with_ymd_and_hms(2026, 8, 5, 11, 15, 0).unwrap();
    TimeEntry {
        id: Uuid::new_v4(),
        employee_id: Uuid::new_v4(),
        session_id: Some(Uuid::new_v4()),
        entry_date: NaiveDate::parse_from_str("2026-08-05", "%Y-%m-%d").unwrap(),
        started_at,
        ended_at,
        duration_minutes: duration_minutes(started_at, ended_at),
        status: EntryStatus::Draft,
        locked: false,
        source: "mobile".to_string(),
        notes: Some(notes.to_string()),
        property_id: None,
        unit_id: None,
        billing_category_id: None,
        property_name: Some("Maple Court".to_string()),
        billing_category_name: Some("Maintenance".to_string()),
    }
}

#[test]
fn csv_export_writes_header_and_rows() {
    let path = temp_out("csv_export", "csv");
    let entries = vec![sample_entry("hedge trimming"), sample_entry("gutters")];

    export_entries(&path, ExportFormat::Csv, &entries, false).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert!(lines.next().unwrap().starts_with("date,start,end,minutes"));
    assert_eq!(lines.count(), 2);
    assert!(content.contains("2026-08-05"));
    assert!(content.contains("135"));
    assert!(content.contains("Maple Court"));
    assert!(content.contains("hedge trimming"));
}

#[test]
fn json_export_round_trips() {
    let path = temp_out("json_export", "json");
    let entries = vec![sample_entry("walkthrough")];

    export_entries(&path, ExportFormat::Json, &entries, false).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let parsed: Vec<TimeEntry> = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].duration_minutes, 135);
    assert_eq!(parsed[0].notes.as_deref(), Some("walkthrough"));
}

#[test]
fn existing_file_needs_force() {
    let path = temp_out("force_export", "csv");
    fs::write(&path, "already here").unwrap();

    let entries = vec![sample_entry("x")];
    let err = export_entries(&path, ExportFormat::Csv, &entries, false).unwrap_err();
    assert!(matches!(err, AppError::Export(_)));

    export_entries(&path, ExportFormat::Csv, &entries, true).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("date,start,end"));
}

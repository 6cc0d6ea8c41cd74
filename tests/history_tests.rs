//! History listing and guarded editing.

use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crewclock::backend::Backend;
use crewclock::backend::mock::MockBackend;
use crewclock::core::history;
use crewclock::errors::AppError;
use crewclock::models::time_entry::{EntryStatus, TimeEntry, TimeEntryPatch};
use crewclock::utils::time::duration_minutes;

fn entry(
    employee_id: Uuid,
    date: &str,
    start: (u32, u32, u32),
    end: (u32, u32, u32),
    status: EntryStatus,
    locked: bool,
) -> TimeEntry {
    let entry_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    let started_at =
        Utc.from_utc_datetime(&entry_date.and_hms_opt(start.0, start.1, start.2).unwrap());
    let ended_at = Utc.from_utc_datetime(&entry_date.and_hms_opt(end.0, end.1, end.2).unwrap());
    TimeEntry {
        id: Uuid::new_v4(),
        employee_id,
        session_id: Some(Uuid::new_v4()),
        entry_date,
        started_at,
        ended_at,
        duration_minutes: duration_minutes(started_at, ended_at),
        status,
        locked,
        source: "mobile".to_string(),
        notes: None,
        property_id: None,
        unit_id: None,
        billing_category_id: None,
        property_name: None,
        billing_category_name: None,
    }
}

#[test]
fn duration_truncates_fractional_minutes() {
    let start = Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2026, 8, 6, 10, 47, 30).unwrap();
    assert_eq!(duration_minutes(start, end), 47);

    let exact_end = Utc.with_ymd_and_hms(2026, 8, 6, 10, 47, 0).unwrap();
    assert_eq!(duration_minutes(start, exact_end), 47);

    assert_eq!(duration_minutes(start, start), 0);
}

#[test]
fn locked_entry_rejected_before_any_mutating_call() {
    let backend = MockBackend::new();
    let employee_id = Uuid::new_v4();
    let row = entry(
        employee_id,
        "2026-08-05",
        (9, 0, 0),
        (17, 0, 0),
        EntryStatus::Draft,
        true,
    );
    let id = row.id;
    backend.push_entry(row);
    backend.clear_calls();

    let err = history::edit_entry(
        &backend,
        id,
        TimeEntryPatch {
            notes: Some("nope".to_string()),
            ..TimeEntryPatch::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::EntryNotEditable(_)));
    assert!(!backend.calls().iter().any(|c| c == "update_time_entry"));

    let err = history::delete_entry(&backend, id).unwrap_err();
    assert!(matches!(err, AppError::EntryNotEditable(_)));
    assert!(!backend.calls().iter().any(|c| c == "delete_time_entry"));
}

#[test]
fn invoiced_entry_rejected_even_when_unlocked() {
    let backend = MockBackend::new();
    let employee_id = Uuid::new_v4();
    let row = entry(
        employee_id,
        "2026-08-05",
        (9, 0, 0),
        (17, 0, 0),
        EntryStatus::Invoiced,
        false,
    );
    let id = row.id;
    backend.push_entry(row);

    let err = history::delete_entry(&backend, id).unwrap_err();
    assert!(matches!(err, AppError::EntryNotEditable(_)));
}

#[test]
fn edit_recomputes_duration_when_times_change() {
    let backend = MockBackend::new();
    let employee_id = Uuid::new_v4();
    let row = entry(
        employee_id,
        "2026-08-05",
        (9, 0, 0),
        (17, 0, 0),
        EntryStatus::Draft,
        false,
    );
    let id = row.id;
    backend.push_entry(row);

    let new_end = Utc.with_ymd_and_hms(2026, 8, 5, 12, 30, 0).unwrap();
    history::edit_entry(
        &backend,
        id,
        TimeEntryPatch {
            ended_at: Some(new_end),
            ..TimeEntryPatch::default()
        },
    )
    .unwrap();

    let updated = backend.time_entry(id).unwrap().unwrap();
    assert_eq!(updated.ended_at, new_end);
    assert_eq!(updated.duration_minutes, 210);
}

#[test]
fn editable_entry_can_be_deleted() {
    let backend = MockBackend::new();
    let employee_id = Uuid::new_v4();
    let row = entry(
        employee_id,
        "2026-08-05",
        (9, 0, 0),
        (17, 0, 0),
        EntryStatus::Draft,
        false,
    );
    let id = row.id;
    backend.push_entry(row);

    history::delete_entry(&backend, id).unwrap();
    assert!(backend.time_entry(id).unwrap().is_none());
}

#[test]
fn missing_entry_reported_as_not_found() {
    let backend = MockBackend::new();
    let err = history::delete_entry(&backend, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, AppError::EntryNotFound(_)));
}

#[test]
fn listing_is_newest_first_and_groups_by_day() {
    let backend = MockBackend::new();
    let employee_id = Uuid::new_v4();
    backend.push_entry(entry(
        employee_id,
        "2026-08-04",
        (9, 0, 0),
        (12, 0, 0),
        EntryStatus::Draft,
        false,
    ));
    backend.push_entry(entry(
        employee_id,
        "2026-08-05",
        (8, 0, 0),
        (10, 0, 0),
        EntryStatus::Draft,
        false,
    ));
    backend.push_entry(entry(
        employee_id,
        "2026-08-05",
        (13, 0, 0),
        (15, 0, 0),
        EntryStatus::Draft,
        false,
    ));

    let listed = history::list_entries(&backend, employee_id, None).unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed[0].started_at >= listed[1].started_at);

    let groups = history::group_by_day(listed);
    assert_eq!(groups.len(), 2);
    assert_eq!(
        groups[0].0,
        NaiveDate::parse_from_str("2026-08-05", "%Y-%m-%d").unwrap()
    );
    assert_eq!(groups[0].1.len(), 2);
    assert_eq!(groups[1].1.len(), 1);
}

#[test]
fn range_filter_bounds_the_listing() {
    let backend = MockBackend::new();
    let employee_id = Uuid::new_v4();
    backend.push_entry(entry(
        employee_id,
        "2026-07-31",
        (9, 0, 0),
        (12, 0, 0),
        EntryStatus::Draft,
        false,
    ));
    backend.push_entry(entry(
        employee_id,
        "2026-08-05",
        (8, 0, 0),
        (10, 0, 0),
        EntryStatus::Draft,
        false,
    ));

    let start = NaiveDate::parse_from_str("2026-08-01", "%Y-%m-%d").unwrap();
    let end = NaiveDate::parse_from_str("2026-08-31", "%Y-%m-%d").unwrap();
    let listed = history::list_entries(&backend, employee_id, Some((start, end))).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].entry_date.to_string(), "2026-08-05");
}

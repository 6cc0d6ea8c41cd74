//! Time entry history: listing, grouping, and guarded edit/delete.
//!
//! Edits are optimistic in spirit: the editability guard runs client-side
//! before any mutating call, and a failed mutation is answered with an alert
//! plus a refetch. The server always wins on refetch.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::backend::Backend;
use crate::errors::{AppError, AppResult};
use crate::models::time_entry::{TimeEntry, TimeEntryPatch};
use crate::utils::time::duration_minutes;

pub fn list_entries(
    backend: &dyn Backend,
    employee_id: Uuid,
    range: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<TimeEntry>> {
    backend.time_entries(employee_id, range)
}

/// Group a newest-first listing by calendar day, preserving order within
/// each day. Day groups come out newest first as well.
pub fn group_by_day(entries: Vec<TimeEntry>) -> Vec<(NaiveDate, Vec<TimeEntry>)> {
    let mut groups: Vec<(NaiveDate, Vec<TimeEntry>)> = Vec::new();
    for entry in entries {
        match groups.last_mut() {
            Some((day, rows)) if *day == entry.entry_date => rows.push(entry),
            _ => groups.push((entry.entry_date, vec![entry])),
        }
    }
    groups
}

/// Fetch the entry and enforce the client-side editability rule before any
/// mutating call goes out.
fn editable_entry(backend: &dyn Backend, id: Uuid) -> AppResult<TimeEntry> {
    let entry = backend
        .time_entry(id)?
        .ok_or_else(|| AppError::EntryNotFound(id.to_string()))?;
    if !entry.is_editable() {
        return Err(AppError::EntryNotEditable(id.to_string()));
    }
    Ok(entry)
}

/// Apply a partial edit. When either timestamp changes, the stored duration
/// is recomputed from the resulting pair.
pub fn edit_entry(backend: &dyn Backend, id: Uuid, mut patch: TimeEntryPatch) -> AppResult<()> {
    let entry = editable_entry(backend, id)?;

    if patch.started_at.is_some() || patch.ended_at.is_some() {
        let start = patch.started_at.unwrap_or(entry.started_at);
        let end = patch.ended_at.unwrap_or(entry.ended_at);
        patch.duration_minutes = Some(duration_minutes(start, end));
    }

    backend.update_time_entry(id, &patch)
}

pub fn delete_entry(backend: &dyn Backend, id: Uuid) -> AppResult<()> {
    editable_entry(backend, id)?;
    backend.delete_time_entry(id)
}

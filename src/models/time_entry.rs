use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::time::duration_minutes;

use super::clock_session::ClockSession;

/// Lifecycle status of a time entry. Only `invoiced` matters to the client:
/// together with the `locked` flag it makes the entry read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Draft,
    Submitted,
    Approved,
    Invoiced,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Draft => "draft",
            EntryStatus::Submitted => "submitted",
            EntryStatus::Approved => "approved",
            EntryStatus::Invoiced => "invoiced",
        }
    }
}

/// Durable billable record derived from a closed clock session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub session_id: Option<Uuid>,
    pub entry_date: NaiveDate,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub status: EntryStatus,
    pub locked: bool,
    pub source: String,
    pub notes: Option<String>,
    pub property_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub billing_category_id: Option<Uuid>,
    // Denormalized display copies, filled by the backend read.
    #[serde(default)]
    pub property_name: Option<String>,
    #[serde(default)]
    pub billing_category_name: Option<String>,
}

impl TimeEntry {
    pub fn is_editable(&self) -> bool {
        !self.locked && self.status != EntryStatus::Invoiced
    }
}

/// Insert payload for the entry derived when a session closes.
#[derive(Debug, Clone, Serialize)]
pub struct NewTimeEntry {
    pub employee_id: Uuid,
    pub session_id: Uuid,
    pub entry_date: NaiveDate,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub status: EntryStatus,
    pub locked: bool,
    pub source: String,
    pub notes: Option<String>,
    pub property_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub billing_category_id: Option<Uuid>,
}

impl NewTimeEntry {
    /// Derive the entry from a closed session. Duration is whole minutes,
    /// fractional seconds truncated.
    pub fn from_session(session: &ClockSession, ended_at: DateTime<Utc>) -> Self {
        Self {
            employee_id: session.employee_id,
            session_id: session.id,
            entry_date: session.started_at.date_naive(),
            started_at: session.started_at,
            ended_at,
            duration_minutes: duration_minutes(session.started_at, ended_at),
            status: EntryStatus::Draft,
            locked: false,
            source: "mobile".to_string(),
            notes: session.notes.clone(),
            property_id: session.property_id,
            unit_id: session.unit_id,
            billing_category_id: session.billing_category_id,
        }
    }
}

/// Partial update sent by the edit command; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimeEntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_category_id: Option<Uuid>,
}

impl TimeEntryPatch {
    pub fn is_empty(&self) -> bool {
        self.notes.is_none()
            && self.started_at.is_none()
            && self.ended_at.is_none()
            && self.duration_minutes.is_none()
            && self.billing_category_id.is_none()
    }
}

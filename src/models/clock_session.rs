use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Work on one task, nested inside a clock period. Closing it is what
/// produces a durable TimeEntry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockSession {
    pub id: Uuid,
    pub workday_id: Uuid,
    pub clock_period_id: Uuid,
    pub employee_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub property_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub billing_category_id: Option<Uuid>,
}

impl ClockSession {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

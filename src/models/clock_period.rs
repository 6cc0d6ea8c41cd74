use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One continuous clocked-in stretch nested inside a workday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockPeriod {
    pub id: Uuid,
    pub workday_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl ClockPeriod {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level open/close span bounding a day of work for one employee.
/// The backend guarantees at most one open workday per employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workday {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Workday {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

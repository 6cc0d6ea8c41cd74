use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw GPS sample as delivered by the platform watcher, before it is tagged
/// with tracking context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpsSample {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub heading: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only sample tagged with the active workday and (if a job is
/// running) the clock session. Never mutated after the append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationPoint {
    pub workday_id: Uuid,
    pub clock_session_id: Option<Uuid>,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

impl GpsSample {
    pub fn tag(&self, workday_id: Uuid, clock_session_id: Option<Uuid>) -> LocationPoint {
        LocationPoint {
            workday_id,
            clock_session_id,
            latitude: self.latitude,
            longitude: self.longitude,
            accuracy: self.accuracy,
            altitude: self.altitude,
            speed: self.speed,
            heading: self.heading,
            recorded_at: self.recorded_at,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Link row between a signed-in account and an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: Uuid,
    pub account_id: Uuid,
    pub org_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Employee row; `membership_id` may lag behind when the employee was
/// provisioned by email before the account existed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub org_id: Uuid,
    pub membership_id: Option<Uuid>,
    pub email: String,
    pub display_name: String,
}

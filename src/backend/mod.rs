//! Remote backend surface.
//!
//! The backend owns every durable business rule (overlap prevention, locking,
//! invoicing); the client consumes it as opaque remote procedures and
//! table-like reads. `Backend` is the seam: the production adapter speaks
//! HTTP ([`http::HttpBackend`]), the test suite scripts an in-process one
//! ([`mock::MockBackend`]).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::clock_period::ClockPeriod;
use crate::models::clock_session::ClockSession;
use crate::models::employee::{Employee, Membership};
use crate::models::location_point::LocationPoint;
use crate::models::lookups::{BillingCategory, Property, Unit};
use crate::models::time_entry::{NewTimeEntry, TimeEntry, TimeEntryPatch};
use crate::models::workday::Workday;

pub mod http;
pub mod mock;

/// Result row of the `clock_in` procedure: the (possibly reopened) workday
/// and the freshly opened clock period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClockInRow {
    pub workday_id: Uuid,
    pub clock_period_id: Uuid,
}

/// Named parameters of the `start_session` procedure.
#[derive(Debug, Clone, Serialize)]
pub struct StartSessionParams {
    pub employee_id: Uuid,
    pub workday_id: Uuid,
    pub clock_period_id: Uuid,
    pub notes: Option<String>,
    pub property_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub billing_category_id: Option<Uuid>,
}

pub trait Backend: Send + Sync {
    // ---------------------------
    // Remote procedures
    // ---------------------------
    fn clock_in(&self, employee_id: Uuid) -> AppResult<ClockInRow>;
    fn clock_out(&self, employee_id: Uuid) -> AppResult<()>;
    fn start_session(&self, params: &StartSessionParams) -> AppResult<ClockSession>;
    fn end_workday(&self, employee_id: Uuid) -> AppResult<()>;
    fn get_active_workday(&self, employee_id: Uuid) -> AppResult<Option<Workday>>;
    fn get_active_clock_period(&self, employee_id: Uuid) -> AppResult<Option<ClockPeriod>>;
    fn append_location_point(&self, point: &LocationPoint) -> AppResult<()>;

    // ---------------------------
    // Table reads / writes
    // ---------------------------
    fn memberships_by_account(&self, account_id: Uuid) -> AppResult<Vec<Membership>>;
    fn employee_by_membership(&self, membership_id: Uuid) -> AppResult<Option<Employee>>;
    fn employee_by_email(&self, org_id: Uuid, email: &str) -> AppResult<Option<Employee>>;
    fn link_employee_membership(&self, employee_id: Uuid, membership_id: Uuid) -> AppResult<()>;

    fn clock_session(&self, id: Uuid) -> AppResult<Option<ClockSession>>;
    fn open_clock_session(&self, workday_id: Uuid) -> AppResult<Option<ClockSession>>;
    fn close_clock_session(&self, id: Uuid, ended_at: DateTime<Utc>) -> AppResult<()>;

    fn insert_time_entry(&self, entry: &NewTimeEntry) -> AppResult<Uuid>;
    fn time_entry(&self, id: Uuid) -> AppResult<Option<TimeEntry>>;
    fn time_entries(
        &self,
        employee_id: Uuid,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<Vec<TimeEntry>>;
    fn update_time_entry(&self, id: Uuid, patch: &TimeEntryPatch) -> AppResult<()>;
    fn delete_time_entry(&self, id: Uuid) -> AppResult<()>;

    fn properties(&self, org_id: Uuid) -> AppResult<Vec<Property>>;
    fn units(&self, property_id: Uuid) -> AppResult<Vec<Unit>>;
    fn billing_categories(&self, org_id: Uuid) -> AppResult<Vec<BillingCategory>>;
}

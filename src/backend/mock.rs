//! Scriptable in-process backend used by the test suite.
//!
//! Keeps rows in memory behind a mutex, records every call in order, and can
//! inject failures per procedure. Row semantics mirror the server contract
//! close enough for the client-side properties under test: one open workday,
//! one open clock period, one open session per employee.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::clock_period::ClockPeriod;
use crate::models::clock_session::ClockSession;
use crate::models::employee::{Employee, Membership};
use crate::models::location_point::LocationPoint;
use crate::models::lookups::{BillingCategory, Property, Unit};
use crate::models::time_entry::{NewTimeEntry, TimeEntry, TimeEntryPatch};
use crate::models::workday::Workday;

use super::{Backend, ClockInRow, StartSessionParams};

#[derive(Default)]
struct MockState {
    memberships: Vec<Membership>,
    employees: Vec<Employee>,
    workdays: Vec<Workday>,
    clock_periods: Vec<ClockPeriod>,
    sessions: Vec<ClockSession>,
    entries: Vec<TimeEntry>,
    points: Vec<LocationPoint>,
    properties: Vec<Property>,
    units: Vec<Unit>,
    categories: Vec<BillingCategory>,
    calls: Vec<String>,
    fail: HashSet<String>,
}

#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&self, method: &str) -> AppResult<MutexGuard<'_, MockState>> {
        let mut st = self.state.lock().expect("mock state poisoned");
        st.calls.push(method.to_string());
        if st.fail.contains(method) {
            return Err(AppError::Backend {
                status: 500,
                message: format!("injected failure: {}", method),
            });
        }
        Ok(st)
    }

    // ---------------------------
    // Scripting surface
    // ---------------------------

    /// Seed an organization, a membership, and an employee already linked to
    /// that membership. Returns the employee.
    pub fn seed_employee(&self, account_id: Uuid, email: &str) -> Employee {
        let mut st = self.state.lock().expect("mock state poisoned");
        let org_id = Uuid::new_v4();
        let membership = Membership {
            id: Uuid::new_v4(),
            account_id,
            org_id,
            created_at: Utc::now(),
        };
        let employee = Employee {
            id: Uuid::new_v4(),
            org_id,
            membership_id: Some(membership.id),
            email: email.to_string(),
            display_name: "Test Crew".to_string(),
        };
        st.memberships.push(membership);
        st.employees.push(employee.clone());
        employee
    }

    /// Seed a membership plus an employee that is NOT linked to it yet
    /// (matched only by org + email). Exercises the backfill path.
    pub fn seed_employee_unlinked(&self, account_id: Uuid, email: &str) -> Employee {
        let mut st = self.state.lock().expect("mock state poisoned");
        let org_id = Uuid::new_v4();
        let membership = Membership {
            id: Uuid::new_v4(),
            account_id,
            org_id,
            created_at: Utc::now(),
        };
        let employee = Employee {
            id: Uuid::new_v4(),
            org_id,
            membership_id: None,
            email: email.to_string(),
            display_name: "Test Crew".to_string(),
        };
        st.memberships.push(membership);
        st.employees.push(employee.clone());
        employee
    }

    pub fn seed_property(&self, org_id: Uuid, name: &str) -> Property {
        let mut st = self.state.lock().expect("mock state poisoned");
        let property = Property {
            id: Uuid::new_v4(),
            org_id,
            name: name.to_string(),
            address: None,
        };
        st.properties.push(property.clone());
        property
    }

    pub fn seed_billing_category(&self, org_id: Uuid, name: &str) -> BillingCategory {
        let mut st = self.state.lock().expect("mock state poisoned");
        let category = BillingCategory {
            id: Uuid::new_v4(),
            org_id,
            name: name.to_string(),
        };
        st.categories.push(category.clone());
        category
    }

    pub fn push_entry(&self, entry: TimeEntry) {
        let mut st = self.state.lock().expect("mock state poisoned");
        st.entries.push(entry);
    }

    /// Make the named procedure fail until `unfail` is called.
    pub fn fail_on(&self, method: &str) {
        let mut st = self.state.lock().expect("mock state poisoned");
        st.fail.insert(method.to_string());
    }

    pub fn unfail(&self, method: &str) {
        let mut st = self.state.lock().expect("mock state poisoned");
        st.fail.remove(method);
    }

    /// Recorded backend calls, in invocation order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().expect("mock state poisoned").calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().expect("mock state poisoned").calls.clear();
    }

    pub fn points(&self) -> Vec<LocationPoint> {
        self.state.lock().expect("mock state poisoned").points.clone()
    }

    pub fn entries(&self) -> Vec<TimeEntry> {
        self.state.lock().expect("mock state poisoned").entries.clone()
    }

    /// Open (workday, clock period, session) counts for one employee.
    pub fn open_counts(&self, employee_id: Uuid) -> (usize, usize, usize) {
        let st = self.state.lock().expect("mock state poisoned");
        let workday_ids: Vec<Uuid> = st
            .workdays
            .iter()
            .filter(|w| w.employee_id == employee_id)
            .map(|w| w.id)
            .collect();
        let open_workdays = st
            .workdays
            .iter()
            .filter(|w| w.employee_id == employee_id && w.is_open())
            .count();
        let open_periods = st
            .clock_periods
            .iter()
            .filter(|p| workday_ids.contains(&p.workday_id) && p.is_open())
            .count();
        let open_sessions = st
            .sessions
            .iter()
            .filter(|s| s.employee_id == employee_id && s.is_open())
            .count();
        (open_workdays, open_periods, open_sessions)
    }
}

fn find_open_workday(st: &MockState, employee_id: Uuid) -> Option<Workday> {
    st.workdays
        .iter()
        .find(|w| w.employee_id == employee_id && w.is_open())
        .cloned()
}

fn find_open_period(st: &MockState, employee_id: Uuid) -> Option<ClockPeriod> {
    let workday_ids: Vec<Uuid> = st
        .workdays
        .iter()
        .filter(|w| w.employee_id == employee_id)
        .map(|w| w.id)
        .collect();
    st.clock_periods
        .iter()
        .find(|p| workday_ids.contains(&p.workday_id) && p.is_open())
        .cloned()
}

impl Backend for MockBackend {
    fn clock_in(&self, employee_id: Uuid) -> AppResult<ClockInRow> {
        let mut st = self.begin("clock_in")?;

        if find_open_period(&st, employee_id).is_some() {
            return Err(AppError::Backend {
                status: 409,
                message: "employee already has an open clock period".to_string(),
            });
        }

        let workday_id = match find_open_workday(&st, employee_id) {
            Some(w) => w.id,
            None => {
                let workday = Workday {
                    id: Uuid::new_v4(),
                    employee_id,
                    started_at: Utc::now(),
                    ended_at: None,
                };
                let id = workday.id;
                st.workdays.push(workday);
                id
            }
        };

        let period = ClockPeriod {
            id: Uuid::new_v4(),
            workday_id,
            started_at: Utc::now(),
            ended_at: None,
        };
        let clock_period_id = period.id;
        st.clock_periods.push(period);

        Ok(ClockInRow {
            workday_id,
            clock_period_id,
        })
    }

    fn clock_out(&self, employee_id: Uuid) -> AppResult<()> {
        let mut st = self.begin("clock_out")?;
        let now = Utc::now();
        // Server-side cascade: an orphaned open session is force-closed too.
        for session in st.sessions.iter_mut() {
            if session.employee_id == employee_id && session.is_open() {
                session.ended_at = Some(now);
            }
        }
        let workday_ids: Vec<Uuid> = st
            .workdays
            .iter()
            .filter(|w| w.employee_id == employee_id)
            .map(|w| w.id)
            .collect();
        for period in st.clock_periods.iter_mut() {
            if workday_ids.contains(&period.workday_id) && period.is_open() {
                period.ended_at = Some(now);
            }
        }
        Ok(())
    }

    fn start_session(&self, params: &StartSessionParams) -> AppResult<ClockSession> {
        let mut st = self.begin("start_session")?;

        if st
            .sessions
            .iter()
            .any(|s| s.employee_id == params.employee_id && s.is_open())
        {
            return Err(AppError::Backend {
                status: 409,
                message: "employee already has an open session".to_string(),
            });
        }

        let session = ClockSession {
            id: Uuid::new_v4(),
            workday_id: params.workday_id,
            clock_period_id: params.clock_period_id,
            employee_id: params.employee_id,
            started_at: Utc::now(),
            ended_at: None,
            notes: params.notes.clone(),
            property_id: params.property_id,
            unit_id: params.unit_id,
            billing_category_id: params.billing_category_id,
        };
        st.sessions.push(session.clone());
        Ok(session)
    }

    fn end_workday(&self, employee_id: Uuid) -> AppResult<()> {
        let mut st = self.begin("end_workday")?;
        let now = Utc::now();
        for session in st.sessions.iter_mut() {
            if session.employee_id == employee_id && session.is_open() {
                session.ended_at = Some(now);
            }
        }
        let workday_ids: Vec<Uuid> = st
            .workdays
            .iter()
            .filter(|w| w.employee_id == employee_id)
            .map(|w| w.id)
            .collect();
        for period in st.clock_periods.iter_mut() {
            if workday_ids.contains(&period.workday_id) && period.is_open() {
                period.ended_at = Some(now);
            }
        }
        for workday in st.workdays.iter_mut() {
            if workday.employee_id == employee_id && workday.is_open() {
                workday.ended_at = Some(now);
            }
        }
        Ok(())
    }

    fn get_active_workday(&self, employee_id: Uuid) -> AppResult<Option<Workday>> {
        let st = self.begin("get_active_workday")?;
        Ok(find_open_workday(&st, employee_id))
    }

    fn get_active_clock_period(&self, employee_id: Uuid) -> AppResult<Option<ClockPeriod>> {
        let st = self.begin("get_active_clock_period")?;
        Ok(find_open_period(&st, employee_id))
    }

    fn append_location_point(&self, point: &LocationPoint) -> AppResult<()> {
        let mut st = self.begin("append_location_point")?;
        st.points.push(point.clone());
        Ok(())
    }

    fn memberships_by_account(&self, account_id: Uuid) -> AppResult<Vec<Membership>> {
        let st = self.begin("memberships_by_account")?;
        let mut rows: Vec<Membership> = st
            .memberships
            .iter()
            .filter(|m| m.account_id == account_id)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.created_at);
        Ok(rows)
    }

    fn employee_by_membership(&self, membership_id: Uuid) -> AppResult<Option<Employee>> {
        let st = self.begin("employee_by_membership")?;
        Ok(st
            .employees
            .iter()
            .find(|e| e.membership_id == Some(membership_id))
            .cloned())
    }

    fn employee_by_email(&self, org_id: Uuid, email: &str) -> AppResult<Option<Employee>> {
        let st = self.begin("employee_by_email")?;
        Ok(st
            .employees
            .iter()
            .find(|e| e.org_id == org_id && e.email == email)
            .cloned())
    }

    fn link_employee_membership(&self, employee_id: Uuid, membership_id: Uuid) -> AppResult<()> {
        let mut st = self.begin("link_employee_membership")?;
        if let Some(employee) = st.employees.iter_mut().find(|e| e.id == employee_id) {
            employee.membership_id = Some(membership_id);
        }
        Ok(())
    }

    fn clock_session(&self, id: Uuid) -> AppResult<Option<ClockSession>> {
        let st = self.begin("clock_session")?;
        Ok(st.sessions.iter().find(|s| s.id == id).cloned())
    }

    fn open_clock_session(&self, workday_id: Uuid) -> AppResult<Option<ClockSession>> {
        let st = self.begin("open_clock_session")?;
        Ok(st
            .sessions
            .iter()
            .find(|s| s.workday_id == workday_id && s.is_open())
            .cloned())
    }

    fn close_clock_session(&self, id: Uuid, ended_at: DateTime<Utc>) -> AppResult<()> {
        let mut st = self.begin("close_clock_session")?;
        match st.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.ended_at = Some(ended_at);
                Ok(())
            }
            None => Err(AppError::Backend {
                status: 404,
                message: format!("session {} not found", id),
            }),
        }
    }

    fn insert_time_entry(&self, entry: &NewTimeEntry) -> AppResult<Uuid> {
        let mut st = self.begin("insert_time_entry")?;
        let property_name = entry.property_id.and_then(|id| {
            st.properties
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.name.clone())
        });
        let billing_category_name = entry.billing_category_id.and_then(|id| {
            st.categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.clone())
        });
        let row = TimeEntry {
            id: Uuid::new_v4(),
            employee_id: entry.employee_id,
            session_id: Some(entry.session_id),
            entry_date: entry.entry_date,
            started_at: entry.started_at,
            ended_at: entry.ended_at,
            duration_minutes: entry.duration_minutes,
            status: entry.status,
            locked: entry.locked,
            source: entry.source.clone(),
            notes: entry.notes.clone(),
            property_id: entry.property_id,
            unit_id: entry.unit_id,
            billing_category_id: entry.billing_category_id,
            property_name,
            billing_category_name,
        };
        let id = row.id;
        st.entries.push(row);
        Ok(id)
    }

    fn time_entry(&self, id: Uuid) -> AppResult<Option<TimeEntry>> {
        let st = self.begin("time_entry")?;
        Ok(st.entries.iter().find(|e| e.id == id).cloned())
    }

    fn time_entries(
        &self,
        employee_id: Uuid,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<Vec<TimeEntry>> {
        let st = self.begin("time_entries")?;
        let mut rows: Vec<TimeEntry> = st
            .entries
            .iter()
            .filter(|e| e.employee_id == employee_id)
            .filter(|e| match range {
                Some((start, end)) => e.entry_date >= start && e.entry_date <= end,
                None => true,
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(rows)
    }

    fn update_time_entry(&self, id: Uuid, patch: &TimeEntryPatch) -> AppResult<()> {
        let mut st = self.begin("update_time_entry")?;
        match st.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                if let Some(notes) = &patch.notes {
                    entry.notes = Some(notes.clone());
                }
                if let Some(started_at) = patch.started_at {
                    entry.started_at = started_at;
                }
                if let Some(ended_at) = patch.ended_at {
                    entry.ended_at = ended_at;
                }
                if let Some(duration) = patch.duration_minutes {
                    entry.duration_minutes = duration;
                }
                if let Some(category) = patch.billing_category_id {
                    entry.billing_category_id = Some(category);
                }
                Ok(())
            }
            None => Err(AppError::Backend {
                status: 404,
                message: format!("time entry {} not found", id),
            }),
        }
    }

    fn delete_time_entry(&self, id: Uuid) -> AppResult<()> {
        let mut st = self.begin("delete_time_entry")?;
        let before = st.entries.len();
        st.entries.retain(|e| e.id != id);
        if st.entries.len() == before {
            return Err(AppError::Backend {
                status: 404,
                message: format!("time entry {} not found", id),
            });
        }
        Ok(())
    }

    fn properties(&self, org_id: Uuid) -> AppResult<Vec<Property>> {
        let st = self.begin("properties")?;
        let mut rows: Vec<Property> = st
            .properties
            .iter()
            .filter(|p| p.org_id == org_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    fn units(&self, property_id: Uuid) -> AppResult<Vec<Unit>> {
        let st = self.begin("units")?;
        let mut rows: Vec<Unit> = st
            .units
            .iter()
            .filter(|u| u.property_id == property_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    fn billing_categories(&self, org_id: Uuid) -> AppResult<Vec<BillingCategory>> {
        let st = self.begin("billing_categories")?;
        let mut rows: Vec<BillingCategory> = st
            .categories
            .iter()
            .filter(|c| c.org_id == org_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }
}

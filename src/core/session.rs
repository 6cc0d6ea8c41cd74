//! The workday/clock/job state machine.
//!
//! One controller instance per process owns the nesting state
//! `Idle → WorkdayOpen → ClockedIn → JobActive`, persists the three active id
//! pointers to the local store, and reconciles them against server truth on
//! every command start. The backend enforces the actual business rules; the
//! controller sequences the remote calls and keeps the pointers honest.
//!
//! Compound operations are sequenced by plain call chaining, not by a
//! transaction: a crash between steps leaves local and server state apart
//! until the next `refresh_state` run reconciles them.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::{Backend, ClockInRow, StartSessionParams};
use crate::core::location::{self, LocationTracker};
use crate::errors::{AppError, AppResult};
use crate::models::clock_period::ClockPeriod;
use crate::models::clock_session::ClockSession;
use crate::models::employee::Employee;
use crate::models::time_entry::NewTimeEntry;
use crate::models::workday::Workday;
use crate::store::Store;
use crate::store::kv;

/// Strictly ordered nesting levels. `SignedOut` never reaches the
/// controller; commands refuse to build one without credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    SignedOut,
    Idle,
    WorkdayOpen,
    ClockedIn,
    JobActive,
}

impl Activity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::SignedOut => "signed out",
            Activity::Idle => "idle",
            Activity::WorkdayOpen => "workday open",
            Activity::ClockedIn => "clocked in",
            Activity::JobActive => "on a job",
        }
    }

    fn from_ids(ids: &kv::ActiveIds) -> Self {
        if ids.clock_session.is_some() {
            Activity::JobActive
        } else if ids.clock_period.is_some() {
            Activity::ClockedIn
        } else if ids.workday.is_some() {
            Activity::WorkdayOpen
        } else {
            Activity::Idle
        }
    }
}

/// Optional references attached to a job.
#[derive(Debug, Clone, Default)]
pub struct JobParams {
    pub notes: Option<String>,
    pub property_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub billing_category_id: Option<Uuid>,
}

/// Primary and secondary results of closing a job, independently observable:
/// the session close is authoritative, the derived entry insert is
/// best-effort and never rolled back.
#[derive(Debug)]
pub struct JobClose {
    pub session_id: Uuid,
    pub ended_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub entry: Result<Uuid, AppError>,
}

#[derive(Debug)]
pub enum EndJobOutcome {
    NoActiveSession,
    Closed(JobClose),
}

/// Server-derived view of the current state, produced by `refresh_state`.
#[derive(Debug)]
pub struct StateSnapshot {
    pub activity: Activity,
    pub workday: Option<Workday>,
    pub clock_period: Option<ClockPeriod>,
    pub session: Option<ClockSession>,
    pub tracking_active: bool,
    /// Foreground location permission not granted; tracking is off and the
    /// UI shows a "GPS off" indicator.
    pub gps_off: bool,
}

pub struct SessionController<'a> {
    backend: &'a dyn Backend,
    store: &'a Store,
    employee: Employee,
    require_job_refs: bool,
}

impl<'a> SessionController<'a> {
    pub fn new(
        backend: &'a dyn Backend,
        store: &'a Store,
        employee: Employee,
        require_job_refs: bool,
    ) -> Self {
        Self {
            backend,
            store,
            employee,
            require_job_refs,
        }
    }

    pub fn employee(&self) -> &Employee {
        &self.employee
    }

    fn tracker(&self) -> LocationTracker<'_> {
        LocationTracker::new(self.backend, self.store)
    }

    pub fn activity(&self) -> AppResult<Activity> {
        Ok(Activity::from_ids(&kv::active_ids(self.store)?))
    }

    /// Open (or reopen) a workday and a clock period. Legal from `Idle` and
    /// `WorkdayOpen`. Requests location permission but does not start
    /// tracking; points are only recorded once a session exists to tag them.
    pub fn clock_in(&self) -> AppResult<ClockInRow> {
        let ids = kv::active_ids(self.store)?;
        if ids.clock_session.is_some() || ids.clock_period.is_some() {
            return Err(AppError::AlreadyClockedIn);
        }

        let row = self.backend.clock_in(self.employee.id)?;
        kv::set_active_workday(self.store, Some(row.workday_id))?;
        kv::set_active_clock_period(self.store, Some(row.clock_period_id))?;

        location::request_permissions(self.store)?;
        info!(workday = %row.workday_id, "clocked in");
        Ok(row)
    }

    /// Start a job session. Performs the implicit upgrade when not clocked
    /// in: exactly one clock-in call, then exactly one start-session call.
    /// Tracking starts only after the session id is stored.
    pub fn start_job(&self, params: JobParams) -> AppResult<ClockSession> {
        if self.require_job_refs
            && (params.property_id.is_none() || params.billing_category_id.is_none())
        {
            return Err(AppError::MissingJobRefs);
        }

        let ids = kv::active_ids(self.store)?;
        if ids.clock_session.is_some() {
            return Err(AppError::JobAlreadyActive);
        }

        let (workday_id, clock_period_id) = match ids.clock_period {
            Some(period_id) => match ids.workday {
                Some(workday_id) => (workday_id, period_id),
                None => {
                    // Stale local pointer: recover the workday from the
                    // server instead of failing.
                    let period = self
                        .backend
                        .get_active_clock_period(self.employee.id)?
                        .ok_or(AppError::NotClockedIn)?;
                    kv::set_active_workday(self.store, Some(period.workday_id))?;
                    kv::set_active_clock_period(self.store, Some(period.id))?;
                    (period.workday_id, period.id)
                }
            },
            None => {
                let row = self.clock_in()?;
                (row.workday_id, row.clock_period_id)
            }
        };

        let session = self.backend.start_session(&StartSessionParams {
            employee_id: self.employee.id,
            workday_id,
            clock_period_id,
            notes: params.notes,
            property_id: params.property_id,
            unit_id: params.unit_id,
            billing_category_id: params.billing_category_id,
        })?;
        kv::set_active_clock_session(self.store, Some(session.id))?;

        self.tracker().start()?;
        info!(session = %session.id, "job started");
        Ok(session)
    }

    /// Close the active session and derive its time entry. No-op without an
    /// active session. The entry insert is the secondary step: its failure
    /// is logged and surfaced in the outcome, never rolled back, never
    /// retried here.
    pub fn end_job(&self) -> AppResult<EndJobOutcome> {
        let ids = kv::active_ids(self.store)?;
        let session_id = match ids.clock_session {
            Some(id) => id,
            None => return Ok(EndJobOutcome::NoActiveSession),
        };

        let session = match self.backend.clock_session(session_id)? {
            Some(s) if s.is_open() => s,
            _ => {
                // The server already closed (or never had) this session;
                // drop the stale pointer.
                kv::set_active_clock_session(self.store, None)?;
                self.tracker().stop()?;
                return Ok(EndJobOutcome::NoActiveSession);
            }
        };

        let ended_at = Utc::now();
        self.backend.close_clock_session(session.id, ended_at)?;

        let payload = NewTimeEntry::from_session(&session, ended_at);
        let duration_minutes = payload.duration_minutes;
        let entry = self.backend.insert_time_entry(&payload);
        if let Err(e) = &entry {
            warn!(session = %session.id, error = %e, "time entry insert failed after session close");
        }

        kv::set_active_clock_session(self.store, None)?;
        self.tracker().stop()?;
        info!(session = %session.id, duration_minutes, "job ended");

        Ok(EndJobOutcome::Closed(JobClose {
            session_id: session.id,
            ended_at,
            duration_minutes,
            entry,
        }))
    }

    /// End the clock period. Ends the active job first. The workday remains
    /// open; the employee may clock back in later the same day.
    pub fn clock_out(&self) -> AppResult<EndJobOutcome> {
        let ids = kv::active_ids(self.store)?;
        if ids.clock_period.is_none() {
            return Err(AppError::NotClockedIn);
        }

        let outcome = self.end_job()?;
        self.backend.clock_out(self.employee.id)?;
        self.tracker().stop()?;
        kv::set_active_clock_period(self.store, None)?;
        kv::set_active_clock_session(self.store, None)?;
        info!("clocked out");
        Ok(outcome)
    }

    /// Cascade: end the job, close the clock period, then call the remote
    /// end-workday procedure, whose server-side cascade closes anything
    /// still open as a safety net.
    pub fn end_workday(&self) -> AppResult<EndJobOutcome> {
        let ids = kv::active_ids(self.store)?;
        if ids.workday.is_none() {
            return Err(AppError::NoOpenWorkday);
        }

        let outcome = self.end_job()?;
        if kv::active_ids(self.store)?.clock_period.is_some() {
            self.backend.clock_out(self.employee.id)?;
        }
        self.backend.end_workday(self.employee.id)?;

        self.tracker().stop()?;
        kv::set_active_workday(self.store, None)?;
        kv::set_active_clock_period(self.store, None)?;
        kv::set_active_clock_session(self.store, None)?;
        info!("workday ended");
        Ok(outcome)
    }

    /// Re-derive the open spans from the server and overwrite the local
    /// pointers to match; locally persisted ids are never trusted alone.
    /// Also re-reads the permission grants and watcher registration.
    pub fn refresh_state(&self) -> AppResult<StateSnapshot> {
        let workday = self.backend.get_active_workday(self.employee.id)?;
        let clock_period = self.backend.get_active_clock_period(self.employee.id)?;
        let session = match &workday {
            Some(w) => self.backend.open_clock_session(w.id)?,
            None => None,
        };

        kv::set_active_workday(self.store, workday.as_ref().map(|w| w.id))?;
        kv::set_active_clock_period(self.store, clock_period.as_ref().map(|p| p.id))?;
        kv::set_active_clock_session(self.store, session.as_ref().map(|s| s.id))?;

        let permissions = location::permission_status(self.store)?;
        let tracking_active = self.tracker().is_active()?;

        let activity = Activity::from_ids(&kv::active_ids(self.store)?);
        Ok(StateSnapshot {
            activity,
            workday,
            clock_period,
            session,
            tracking_active,
            gps_off: permissions.foreground != location::PermissionStatus::Granted,
        })
    }
}

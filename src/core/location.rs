//! Background location tracking service.
//!
//! Wraps the platform surface behind four operations: start, stop,
//! query-active, and permission handling. In this client the platform's
//! background callback arrives as a `track --submit` invocation carrying a
//! batch of samples; the watcher flag and permission grants live in the
//! local store, which is the only state shared with the session controller.

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::errors::AppResult;
use crate::models::location_point::GpsSample;
use crate::store::Store;
use crate::store::kv;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    NotRequested,
    Requested,
    Granted,
    Denied,
}

impl PermissionStatus {
    fn from_raw(raw: Option<String>) -> Self {
        match raw.as_deref() {
            Some("granted") => PermissionStatus::Granted,
            Some("denied") => PermissionStatus::Denied,
            Some("requested") => PermissionStatus::Requested,
            _ => PermissionStatus::NotRequested,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionStatus::NotRequested => "not requested",
            PermissionStatus::Requested => "requested",
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Permissions {
    pub foreground: PermissionStatus,
    pub background: PermissionStatus,
}

pub fn permission_status(store: &Store) -> AppResult<Permissions> {
    Ok(Permissions {
        foreground: PermissionStatus::from_raw(store.get(kv::PERM_FOREGROUND)?),
        background: PermissionStatus::from_raw(store.get(kv::PERM_BACKGROUND)?),
    })
}

/// Request permissions, foreground first, then background. Background is
/// optional: tracking proceeds without it, with degraded behavior when the
/// app is not foregrounded. Already-resolved grants are left untouched.
pub fn request_permissions(store: &Store) -> AppResult<Permissions> {
    let current = permission_status(store)?;
    if current.foreground == PermissionStatus::NotRequested {
        store.set(kv::PERM_FOREGROUND, "requested")?;
    }
    if current.background == PermissionStatus::NotRequested {
        store.set(kv::PERM_BACKGROUND, "requested")?;
    }
    permission_status(store)
}

/// Record the user's answer to a permission request.
pub fn set_permission(store: &Store, background: bool, granted: bool) -> AppResult<()> {
    let key = if background {
        kv::PERM_BACKGROUND
    } else {
        kv::PERM_FOREGROUND
    };
    store.set(key, if granted { "granted" } else { "denied" })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyActive,
    /// Foreground permission missing: tracking silently stays off.
    PermissionMissing,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOutcome {
    pub forwarded: usize,
    pub failed: usize,
    /// True when the whole batch was discarded for lack of an active workday.
    pub dropped_all: bool,
}

pub struct LocationTracker<'a> {
    backend: &'a dyn Backend,
    store: &'a Store,
}

impl<'a> LocationTracker<'a> {
    pub fn new(backend: &'a dyn Backend, store: &'a Store) -> Self {
        Self { backend, store }
    }

    pub fn is_active(&self) -> AppResult<bool> {
        kv::is_flag_set(self.store, kv::TRACKING_ACTIVE)
    }

    /// Register the watcher. Idempotent; checks the current registration
    /// before touching anything.
    pub fn start(&self) -> AppResult<StartOutcome> {
        if self.is_active()? {
            return Ok(StartOutcome::AlreadyActive);
        }
        let perms = permission_status(self.store)?;
        if perms.foreground != PermissionStatus::Granted {
            debug!("foreground location permission missing, tracking stays off");
            return Ok(StartOutcome::PermissionMissing);
        }
        kv::set_flag(self.store, kv::TRACKING_ACTIVE, true)?;
        Ok(StartOutcome::Started)
    }

    /// Unregister the watcher. Idempotent. Returns whether it was active.
    pub fn stop(&self) -> AppResult<bool> {
        let was_active = self.is_active()?;
        if was_active {
            kv::set_flag(self.store, kv::TRACKING_ACTIVE, false)?;
        }
        Ok(was_active)
    }

    /// Forward one observed batch. No workday ⇒ no tracking context: the
    /// whole batch is dropped. The session id may be null between jobs.
    /// Individual point failures are logged and dropped, not queued.
    pub fn submit_batch(&self, samples: &[GpsSample]) -> AppResult<BatchOutcome> {
        let ids = kv::active_ids(self.store)?;

        let workday_id = match ids.workday {
            Some(id) => id,
            None => {
                debug!(count = samples.len(), "no active workday, dropping batch");
                return Ok(BatchOutcome {
                    forwarded: 0,
                    failed: 0,
                    dropped_all: true,
                });
            }
        };

        let mut outcome = BatchOutcome::default();
        for sample in samples {
            let point = sample.tag(workday_id, ids.clock_session);
            match self.backend.append_location_point(&point) {
                Ok(()) => outcome.forwarded += 1,
                Err(e) => {
                    warn!(error = %e, "dropping location point after failed append");
                    outcome.failed += 1;
                }
            }
        }
        Ok(outcome)
    }
}

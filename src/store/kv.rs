//! Typed accessors over the kv table.
//!
//! The three active id pointers are the only cross-component shared mutable
//! state in the client: written by the session controller, read by the
//! location service. Each one is independently settable to null.

use crate::errors::AppResult;
use crate::store::Store;
use tracing::warn;
use uuid::Uuid;

pub const ACTIVE_WORKDAY_ID: &str = "active_workday_id";
pub const ACTIVE_CLOCK_PERIOD_ID: &str = "active_clock_period_id";
pub const ACTIVE_CLOCK_SESSION_ID: &str = "active_clock_session_id";

pub const PERM_FOREGROUND: &str = "location_permission_foreground";
pub const PERM_BACKGROUND: &str = "location_permission_background";
pub const TRACKING_ACTIVE: &str = "tracking_active";

/// The locally cached pointers to the currently open spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveIds {
    pub workday: Option<Uuid>,
    pub clock_period: Option<Uuid>,
    pub clock_session: Option<Uuid>,
}

fn get_id(store: &Store, key: &str) -> AppResult<Option<Uuid>> {
    match store.get(key)? {
        Some(raw) => match Uuid::parse_str(&raw) {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                // A corrupt pointer is worthless; drop it and let the next
                // refresh repopulate from the server.
                warn!(key, value = %raw, "discarding unparseable active id");
                store.unset(key)?;
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

fn set_id(store: &Store, key: &str, id: Option<Uuid>) -> AppResult<()> {
    match id {
        Some(id) => store.set(key, &id.to_string()),
        None => store.unset(key),
    }
}

pub fn active_ids(store: &Store) -> AppResult<ActiveIds> {
    Ok(ActiveIds {
        workday: get_id(store, ACTIVE_WORKDAY_ID)?,
        clock_period: get_id(store, ACTIVE_CLOCK_PERIOD_ID)?,
        clock_session: get_id(store, ACTIVE_CLOCK_SESSION_ID)?,
    })
}

pub fn set_active_workday(store: &Store, id: Option<Uuid>) -> AppResult<()> {
    set_id(store, ACTIVE_WORKDAY_ID, id)
}

pub fn set_active_clock_period(store: &Store, id: Option<Uuid>) -> AppResult<()> {
    set_id(store, ACTIVE_CLOCK_PERIOD_ID, id)
}

pub fn set_active_clock_session(store: &Store, id: Option<Uuid>) -> AppResult<()> {
    set_id(store, ACTIVE_CLOCK_SESSION_ID, id)
}

pub fn is_flag_set(store: &Store, key: &str) -> AppResult<bool> {
    Ok(matches!(store.get(key)?.as_deref(), Some("1")))
}

pub fn set_flag(store: &Store, key: &str, on: bool) -> AppResult<()> {
    if on {
        store.set(key, "1")
    } else {
        store.unset(key)
    }
}

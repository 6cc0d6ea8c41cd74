//! Unified application error type.
//! All modules (backend, store, core, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Local store
    // ---------------------------
    #[error("Local store error: {0}")]
    Store(#[from] rusqlite::Error),

    // ---------------------------
    // Backend
    // ---------------------------
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend rejected the request (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Unexpected backend response: {0}")]
    BackendDecode(#[from] serde_json::Error),

    // ---------------------------
    // Identity
    // ---------------------------
    #[error("No organization membership found for account {0}")]
    NoMembership(String),

    #[error("No employee record found for {0}")]
    NoEmployee(String),

    #[error("Not signed in: set account_id, email and access_token in the config file")]
    NotSignedIn,

    // ---------------------------
    // State machine
    // ---------------------------
    #[error("Already clocked in")]
    AlreadyClockedIn,

    #[error("A job is already running; end it before starting another")]
    JobAlreadyActive,

    #[error("Not clocked in")]
    NotClockedIn,

    #[error("No open workday")]
    NoOpenWorkday,

    #[error("A property and billing category are required to start a job")]
    MissingJobRefs,

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    // ---------------------------
    // History editing
    // ---------------------------
    #[error("Time entry {0} not found")]
    EntryNotFound(String),

    #[error("Time entry {0} is locked or invoiced and can no longer be changed")]
    EntryNotEditable(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;

pub mod clock_in;
pub mod clock_out;
pub mod config;
pub mod del;
pub mod edit;
pub mod end;
pub mod endday;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod lookup;
pub mod start;
pub mod status;
pub mod track;

use uuid::Uuid;

use crate::backend::http::HttpBackend;
use crate::config::Config;
use crate::core::identity;
use crate::core::session::{EndJobOutcome, SessionController};
use crate::errors::{AppError, AppResult};
use crate::models::employee::Employee;
use crate::store::Store;
use crate::ui::messages;

/// Everything a signed-in command needs: the open local store, the HTTP
/// backend, and the resolved employee.
pub struct AppContext {
    pub store: Store,
    pub backend: HttpBackend,
    pub employee: Employee,
    pub require_job_refs: bool,
}

impl AppContext {
    pub fn connect(cfg: &Config) -> AppResult<Self> {
        if !cfg.is_signed_in() {
            return Err(AppError::NotSignedIn);
        }
        let account_id = Uuid::parse_str(&cfg.account_id)
            .map_err(|_| AppError::InvalidId(cfg.account_id.clone()))?;

        let store = Store::open(&cfg.store)?;
        let backend = HttpBackend::from_config(cfg);

        let employee = match identity::resolve_employee(&backend, account_id, &cfg.email) {
            Ok(employee) => employee,
            Err(e @ (AppError::NoMembership(_) | AppError::NoEmployee(_))) => {
                // Terminal for this account: there is nothing the user can
                // retry on their own.
                messages::error("No employee profile is linked to this account.");
                messages::info("Contact your administrator to get your account linked.");
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            store,
            backend,
            employee,
            require_job_refs: cfg.require_job_refs,
        })
    }

    pub fn controller(&self) -> SessionController<'_> {
        SessionController::new(
            &self.backend,
            &self.store,
            self.employee.clone(),
            self.require_job_refs,
        )
    }
}

pub fn parse_uuid(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidId(raw.to_string()))
}

/// Print the outcome of a job close: the session result and, independently,
/// the derived time entry result.
pub fn report_job_close(outcome: &EndJobOutcome) {
    if let EndJobOutcome::Closed(close) = outcome {
        messages::success(format!(
            "Job ended after {}",
            crate::utils::formatting::mins2readable(close.duration_minutes, false, false)
        ));
        match &close.entry {
            Ok(entry_id) => messages::info(format!("Time entry {} created", entry_id)),
            Err(e) => messages::warning(format!(
                "Session closed, but the time entry could not be created: {}",
                e
            )),
        }
    }
}

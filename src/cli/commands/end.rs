use crate::cli::commands::{AppContext, report_job_close};
use crate::config::Config;
use crate::core::session::EndJobOutcome;
use crate::errors::AppResult;
use crate::store::log;
use crate::ui::messages;

/// Handle the `end` command: close the running job session.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let ctx = AppContext::connect(cfg)?;
    let ctl = ctx.controller();
    ctl.refresh_state()?;

    let outcome = ctl.end_job()?;
    match &outcome {
        EndJobOutcome::NoActiveSession => {
            messages::info("No job is running");
        }
        EndJobOutcome::Closed(close) => {
            report_job_close(&outcome);
            log::audit(
                &ctx.store,
                "end_job",
                &close.session_id.to_string(),
                "Job ended",
            )?;
        }
    }

    Ok(())
}

use crate::cli::commands::{AppContext, report_job_close};
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::log;
use crate::ui::messages;

/// Handle the `endday` command: close the whole workday. Any running job is
/// ended and the clock period closed first; the server-side cascade covers
/// whatever is still open.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let ctx = AppContext::connect(cfg)?;
    let ctl = ctx.controller();
    ctl.refresh_state()?;

    let outcome = ctl.end_workday()?;
    report_job_close(&outcome);

    log::audit(&ctx.store, "end_workday", "", "Workday ended")?;
    messages::success("Workday ended, see you tomorrow!");
    Ok(())
}

use crate::cli::commands::{AppContext, report_job_close};
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::log;
use crate::ui::messages;

/// Handle the `out` command: end the clock period. An active job is ended
/// first; the workday stays open.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let ctx = AppContext::connect(cfg)?;
    let ctl = ctx.controller();
    ctl.refresh_state()?;

    let outcome = ctl.clock_out()?;
    report_job_close(&outcome);

    log::audit(&ctx.store, "clock_out", "", "Clocked out")?;
    messages::success("Clocked out, the workday stays open");
    Ok(())
}

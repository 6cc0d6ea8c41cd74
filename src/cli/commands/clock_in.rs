use crate::cli::commands::AppContext;
use crate::config::Config;
use crate::core::location::{self, PermissionStatus};
use crate::errors::AppResult;
use crate::store::log;
use crate::ui::messages;

/// Handle the `in` command: open (or reopen) the workday.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let ctx = AppContext::connect(cfg)?;
    let ctl = ctx.controller();
    ctl.refresh_state()?;

    let row = ctl.clock_in()?;

    log::audit(&ctx.store, "clock_in", &row.workday_id.to_string(), "Clocked in")?;
    messages::success("Clocked in, have a good shift!");

    let permissions = location::permission_status(&ctx.store)?;
    if permissions.foreground != PermissionStatus::Granted {
        messages::info(
            "Location permission pending: 'crewclock track --allow foreground' enables GPS tagging",
        );
    }

    Ok(())
}

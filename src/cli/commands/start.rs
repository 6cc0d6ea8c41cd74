use crate::cli::commands::{AppContext, parse_uuid};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::JobParams;
use crate::errors::AppResult;
use crate::store::log;
use crate::ui::messages;

/// Handle the `start` command: begin a job session, clocking in first when
/// needed.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Start {
        property,
        unit,
        category,
        notes,
    } = cmd
    {
        //
        // 1. Parse the optional references
        //
        let property_id = property.as_deref().map(parse_uuid).transpose()?;
        let unit_id = unit.as_deref().map(parse_uuid).transpose()?;
        let billing_category_id = category.as_deref().map(parse_uuid).transpose()?;

        //
        // 2. Connect and reconcile
        //
        let ctx = AppContext::connect(cfg)?;
        let ctl = ctx.controller();
        let before = ctl.refresh_state()?;

        //
        // 3. Start the job (implicit clock-in when idle)
        //
        let session = ctl.start_job(JobParams {
            notes: notes.clone(),
            property_id,
            unit_id,
            billing_category_id,
        })?;

        log::audit(&ctx.store, "start_job", &session.id.to_string(), "Job started")?;
        messages::success("Job started");

        if before.gps_off {
            messages::warning("GPS off: job runs without location tagging");
        }
    }

    Ok(())
}

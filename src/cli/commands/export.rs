use crate::cli::commands::AppContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{export, history};
use crate::errors::AppResult;
use crate::store::log;
use crate::ui::messages;
use crate::utils::date;

/// Handle the `export` command.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        force,
    } = cmd
    {
        let period = range.as_deref().map(date::parse_period).transpose()?;

        let ctx = AppContext::connect(cfg)?;
        let entries = history::list_entries(&ctx.backend, ctx.employee.id, period)?;

        export::export_entries(file, *format, &entries, *force)?;

        log::audit(
            &ctx.store,
            "export",
            file,
            &format!("Exported {} entries", entries.len()),
        )?;
        messages::success(format!("Exported {} entries to {}", entries.len(), file));
    }

    Ok(())
}

use crate::backend::Backend;
use crate::cli::commands::{AppContext, parse_uuid};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::history;
use crate::errors::{AppError, AppResult};
use crate::store::log;
use crate::ui::messages;

/// Handle the `del` command. Same guard as editing: locked or invoiced
/// entries never reach the backend.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id } = cmd {
        let entry_id = parse_uuid(id)?;
        let ctx = AppContext::connect(cfg)?;

        match history::delete_entry(&ctx.backend, entry_id) {
            Ok(()) => {
                log::audit(&ctx.store, "del", id, "Time entry deleted")?;
                messages::success("Time entry deleted");
                Ok(())
            }
            Err(e @ (AppError::EntryNotEditable(_) | AppError::EntryNotFound(_))) => Err(e),
            Err(e) => {
                messages::warning(format!("Delete failed: {}", e));
                if let Ok(Some(entry)) = ctx.backend.time_entry(entry_id) {
                    messages::info(format!(
                        "Entry still on the server ({} min, {})",
                        entry.duration_minutes,
                        entry.status.as_str()
                    ));
                }
                Err(e)
            }
        }
    } else {
        Ok(())
    }
}

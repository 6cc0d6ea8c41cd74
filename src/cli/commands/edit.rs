use chrono::{Local, TimeZone, Utc};

use crate::backend::Backend;
use crate::cli::commands::{AppContext, parse_uuid};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::history;
use crate::errors::{AppError, AppResult};
use crate::models::time_entry::{TimeEntry, TimeEntryPatch};
use crate::store::log;
use crate::ui::messages;
use crate::utils::time::parse_time;

/// Handle the `edit` command. Locked or invoiced entries are rejected before
/// any remote call; a remote failure is answered with a refetch so the
/// server's version is what the user sees next.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        id,
        notes,
        start,
        end,
        category,
    } = cmd
    {
        let entry_id = parse_uuid(id)?;
        let ctx = AppContext::connect(cfg)?;

        // The entry's own date anchors any HH:MM edit.
        let current = ctx
            .backend
            .time_entry(entry_id)?
            .ok_or_else(|| AppError::EntryNotFound(id.clone()))?;

        let mut patch = TimeEntryPatch {
            notes: notes.clone(),
            billing_category_id: category.as_deref().map(parse_uuid).transpose()?,
            ..TimeEntryPatch::default()
        };
        if let Some(raw) = start {
            patch.started_at = Some(local_on_entry_date(&current, raw)?);
        }
        if let Some(raw) = end {
            patch.ended_at = Some(local_on_entry_date(&current, raw)?);
        }

        if patch.is_empty() {
            messages::info("Nothing to change");
            return Ok(());
        }

        match history::edit_entry(&ctx.backend, entry_id, patch) {
            Ok(()) => {
                log::audit(&ctx.store, "edit", id, "Time entry updated")?;
                messages::success("Time entry updated");
                Ok(())
            }
            Err(e @ (AppError::EntryNotEditable(_) | AppError::EntryNotFound(_))) => Err(e),
            Err(e) => {
                // Server wins: surface the failure, then show its version.
                messages::warning(format!("Update failed: {}", e));
                resync(&ctx, entry_id);
                Err(e)
            }
        }
    } else {
        Ok(())
    }
}

fn local_on_entry_date(entry: &TimeEntry, raw: &str) -> AppResult<chrono::DateTime<Utc>> {
    let time = parse_time(raw).ok_or_else(|| AppError::InvalidTime(raw.to_string()))?;
    let local = Local
        .from_local_datetime(&entry.entry_date.and_time(time))
        .earliest()
        .ok_or_else(|| AppError::InvalidTime(raw.to_string()))?;
    Ok(local.with_timezone(&Utc))
}

fn resync(ctx: &AppContext, entry_id: uuid::Uuid) {
    match ctx.backend.time_entry(entry_id) {
        Ok(Some(entry)) => {
            messages::info(format!(
                "Server version: {} {} - {} ({} min, {})",
                entry.entry_date,
                entry.started_at.with_timezone(&Local).format("%H:%M"),
                entry.ended_at.with_timezone(&Local).format("%H:%M"),
                entry.duration_minutes,
                entry.status.as_str()
            ));
        }
        Ok(None) => messages::info("Entry no longer exists on the server"),
        Err(refetch_err) => messages::warning(format!("Refetch failed too: {}", refetch_err)),
    }
}

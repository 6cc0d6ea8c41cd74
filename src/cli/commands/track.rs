use std::fs::File;
use std::io;

use crate::backend::http::HttpBackend;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::location::{self, LocationTracker, StartOutcome};
use crate::errors::{AppError, AppResult};
use crate::models::location_point::GpsSample;
use crate::store::{Store, log};
use crate::ui::messages;

/// Handle the `track` command: the platform surface of location tracking.
///
/// Does not resolve the employee. The background path shares only the local
/// store and the backend with the rest of the client, like the platform
/// callback it stands in for.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Track {
        allow,
        deny,
        status,
        start,
        stop,
        submit,
    } = cmd
    {
        let store = Store::open(&cfg.store)?;
        let backend = HttpBackend::from_config(cfg);
        let tracker = LocationTracker::new(&backend, &store);

        if let Some(scope) = allow {
            let background = parse_scope(scope)?;
            location::set_permission(&store, background, true)?;
            messages::success(format!("{} location permission granted", scope));
        }

        if let Some(scope) = deny {
            let background = parse_scope(scope)?;
            location::set_permission(&store, background, false)?;
            messages::warning(format!("{} location permission denied", scope));
        }

        if *start {
            match tracker.start()? {
                StartOutcome::Started => messages::success("Location watcher registered"),
                StartOutcome::AlreadyActive => messages::info("Location watcher already active"),
                StartOutcome::PermissionMissing => messages::warning(
                    "Foreground permission not granted, watcher stays off",
                ),
            }
        }

        if *stop {
            if tracker.stop()? {
                messages::success("Location watcher unregistered");
            } else {
                messages::info("Location watcher was not active");
            }
        }

        if let Some(source) = submit {
            let samples = read_batch(source)?;
            let outcome = tracker.submit_batch(&samples)?;

            if outcome.dropped_all {
                messages::warning(format!(
                    "No active workday: dropped the whole batch ({} samples)",
                    samples.len()
                ));
            } else {
                messages::success(format!(
                    "Forwarded {}/{} points",
                    outcome.forwarded,
                    samples.len()
                ));
                if outcome.failed > 0 {
                    messages::warning(format!("{} points failed and were dropped", outcome.failed));
                }
            }
            log::audit(
                &store,
                "track_submit",
                "",
                &format!(
                    "batch: {} forwarded, {} failed, dropped_all={}",
                    outcome.forwarded, outcome.failed, outcome.dropped_all
                ),
            )?;
        }

        let no_action = allow.is_none()
            && deny.is_none()
            && !*start
            && !*stop
            && submit.is_none();
        if *status || no_action {
            let permissions = location::permission_status(&store)?;
            messages::header("Location tracking");
            println!("Foreground permission: {}", permissions.foreground.as_str());
            println!("Background permission: {}", permissions.background.as_str());
            println!(
                "Watcher: {}",
                if tracker.is_active()? { "registered" } else { "off" }
            );
        }
    }

    Ok(())
}

fn parse_scope(scope: &str) -> AppResult<bool> {
    match scope {
        "foreground" => Ok(false),
        "background" => Ok(true),
        other => Err(AppError::Other(format!(
            "unknown permission scope '{}', expected foreground or background",
            other
        ))),
    }
}

fn read_batch(source: &str) -> AppResult<Vec<GpsSample>> {
    let samples = if source == "-" {
        serde_json::from_reader(io::stdin())
    } else {
        serde_json::from_reader(File::open(source)?)
    };
    samples.map_err(|e| AppError::Other(format!("invalid sample batch: {}", e)))
}

use chrono::{Local, Utc};

use crate::cli::commands::AppContext;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages;
use crate::utils::formatting::mins2readable;
use crate::utils::time::duration_minutes;

/// Show the current workday/clock/job state, reconciled against the server.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let ctx = AppContext::connect(cfg)?;
    let ctl = ctx.controller();
    let snapshot = ctl.refresh_state()?;

    messages::header("Current status");
    println!("👷 {} <{}>", ctx.employee.display_name, ctx.employee.email);
    println!("🕐 State: {}", snapshot.activity.as_str());

    if let Some(workday) = &snapshot.workday {
        println!(
            "   Workday open since {}",
            workday.started_at.with_timezone(&Local).format("%H:%M")
        );
    }
    if let Some(period) = &snapshot.clock_period {
        println!(
            "   Clocked in since {}",
            period.started_at.with_timezone(&Local).format("%H:%M")
        );
    }
    if let Some(session) = &snapshot.session {
        let elapsed = duration_minutes(session.started_at, Utc::now());
        let notes = session.notes.as_deref().unwrap_or("(no notes)");
        println!(
            "   Job running for {}: {}",
            mins2readable(elapsed, false, false),
            notes
        );
        if let Some(property_id) = session.property_id {
            println!("   Property: {}", property_id);
        }
        if let Some(category_id) = session.billing_category_id {
            println!("   Billing category: {}", category_id);
        }
    }

    println!(
        "📡 Location tracking: {}",
        if snapshot.tracking_active { "on" } else { "off" }
    );
    if snapshot.gps_off {
        messages::warning(
            "GPS off: grant foreground permission with 'crewclock track --allow foreground'",
        );
    }

    Ok(())
}

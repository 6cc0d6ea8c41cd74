use chrono::Local;

use crate::cli::commands::AppContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::history;
use crate::errors::AppResult;
use crate::ui::messages;
use crate::utils::colors;
use crate::utils::date::{self, weekday_short};
use crate::utils::formatting::ellipsize;
use crate::utils::table::{Column, Table};

/// Handle the `list` command: time entries newest first, grouped by day.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { period, now } = cmd {
        let range = if *now {
            let today = date::today();
            Some((today, today))
        } else if let Some(p) = period {
            Some(date::parse_period(p)?)
        } else {
            None
        };

        let ctx = AppContext::connect(cfg)?;
        let entries = history::list_entries(&ctx.backend, ctx.employee.id, range)?;

        if entries.is_empty() {
            messages::info("No time entries found");
            return Ok(());
        }

        let total: i64 = entries.iter().map(|e| e.duration_minutes).sum();
        let count = entries.len();

        for (day, rows) in history::group_by_day(entries) {
            println!(
                "{}── {} {} ──{}",
                colors::BLUE,
                day.format("%Y-%m-%d"),
                weekday_short(&day),
                colors::RESET
            );

            let mut table = Table::new(vec![
                Column { header: "Id".to_string(), width: 36 },
                Column { header: "Start".to_string(), width: 5 },
                Column { header: "End".to_string(), width: 5 },
                Column { header: "Dur".to_string(), width: 6 },
                Column { header: "Property".to_string(), width: 18 },
                Column { header: "Category".to_string(), width: 14 },
                Column { header: "Status".to_string(), width: 10 },
                Column { header: "Notes".to_string(), width: 30 },
            ]);

            for entry in &rows {
                let status = if entry.locked {
                    format!("{} 🔒", entry.status.as_str())
                } else {
                    entry.status.as_str().to_string()
                };
                table.add_row(vec![
                    entry.id.to_string(),
                    entry.started_at.with_timezone(&Local).format("%H:%M").to_string(),
                    entry.ended_at.with_timezone(&Local).format("%H:%M").to_string(),
                    crate::utils::time::format_minutes(entry.duration_minutes),
                    ellipsize(entry.property_name.as_deref().unwrap_or("-"), 18),
                    ellipsize(entry.billing_category_name.as_deref().unwrap_or("-"), 14),
                    status,
                    ellipsize(entry.notes.as_deref().unwrap_or(""), 30),
                ]);
            }

            print!("{}", table.render());
            println!();
        }

        println!(
            "{} entries, {} total",
            count,
            crate::utils::formatting::mins2readable(total, false, false)
        );
    }

    Ok(())
}

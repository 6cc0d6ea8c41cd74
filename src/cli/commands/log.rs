use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::{Store, log};
use crate::ui::messages;
use crate::utils::colors;

fn color_for_operation(op: &str) -> &'static str {
    match op {
        "clock_in" | "start_job" => colors::GREEN,
        "clock_out" | "end_job" | "end_workday" => colors::YELLOW,
        "edit" => colors::CYAN,
        "del" => colors::RED,
        "init" | "export" => colors::BLUE,
        _ => colors::RESET,
    }
}

/// Handle the `log` command: print the local operation log.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { print } = cmd {
        if !*print {
            messages::info("Use 'crewclock log --print' to show the operation log");
            return Ok(());
        }

        let store = Store::open(&cfg.store)?;
        let rows = log::load_audit(&store)?;

        if rows.is_empty() {
            messages::info("Operation log is empty");
            return Ok(());
        }

        let id_w = rows
            .iter()
            .map(|r| r.id.to_string().len())
            .max()
            .unwrap_or(2);
        let date_w = rows.iter().map(|r| r.date.len()).max().unwrap_or(10);
        let op_w = rows.iter().map(|r| r.operation.len()).max().unwrap_or(8);

        println!("📜 Operation log:\n");
        for row in rows {
            let color = color_for_operation(&row.operation);
            let target = if row.target.is_empty() {
                String::new()
            } else {
                format!(" ({})", row.target)
            };
            println!(
                "{:>id_w$}: {:<date_w$} | {}{:<op_w$}{}{} => {}",
                row.id,
                row.date,
                color,
                row.operation,
                colors::RESET,
                target,
                row.message,
                id_w = id_w,
                date_w = date_w,
                op_w = op_w
            );
        }
    }

    Ok(())
}

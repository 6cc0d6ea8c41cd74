use crate::cli::parser::Commands;
use crate::config::{Config, migrate};
use crate::errors::AppResult;
use crate::ui::messages;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate: do_migrate,
    } = cmd
    {
        let path = Config::config_file();

        // ---- PRINT CONFIG ----
        if *print_config {
            println!("📄 Current configuration:\n");
            println!(
                "{}",
                serde_yaml::to_string(&cfg).unwrap_or_else(|_| "<unreadable>".to_string())
            );
        }

        // ---- CHECK ----
        if *check {
            if !path.exists() {
                messages::warning("No configuration file found; run 'crewclock init' first");
                return Ok(());
            }
            let missing = migrate::missing_keys(&path)?;
            if missing.is_empty() {
                messages::success("Configuration file is complete");
            } else {
                messages::warning(format!("Missing keys: {}", missing.join(", ")));
                messages::info("Run 'crewclock config --migrate' to fill them with defaults");
            }
        }

        // ---- MIGRATE ----
        if *do_migrate {
            let added = migrate::fill_missing_keys(&path)?;
            if added.is_empty() {
                messages::info("Nothing to migrate");
            } else {
                messages::success(format!("Added keys: {}", added.join(", ")));
            }
        }
    }

    Ok(())
}

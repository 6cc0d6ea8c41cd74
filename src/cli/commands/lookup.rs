use crate::cli::commands::{AppContext, parse_uuid};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::lookup;
use crate::errors::AppResult;
use crate::ui::messages;
use crate::utils::table::{Column, Table};

/// Handle the `lookup` command: the option lists a job can reference.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Lookup {
        properties,
        units,
        categories,
    } = cmd
    {
        let ctx = AppContext::connect(cfg)?;
        let org_id = ctx.employee.org_id;

        // No flags: show everything except units (those need a property).
        let show_all = !*properties && units.is_none() && !*categories;

        if *properties || show_all {
            let rows = lookup::properties(&ctx.backend, org_id)?;
            if rows.is_empty() {
                messages::info("No properties");
            } else {
                messages::header("Properties");
                let mut table = Table::new(vec![
                    Column { header: "Id".to_string(), width: 36 },
                    Column { header: "Name".to_string(), width: 24 },
                    Column { header: "Address".to_string(), width: 30 },
                ]);
                for p in rows {
                    table.add_row(vec![
                        p.id.to_string(),
                        p.name,
                        p.address.unwrap_or_default(),
                    ]);
                }
                print!("{}", table.render());
            }
        }

        if let Some(property) = units {
            let property_id = parse_uuid(property)?;
            let rows = lookup::units(&ctx.backend, property_id)?;
            if rows.is_empty() {
                messages::info("No units for this property");
            } else {
                messages::header("Units");
                let mut table = Table::new(vec![
                    Column { header: "Id".to_string(), width: 36 },
                    Column { header: "Name".to_string(), width: 24 },
                ]);
                for u in rows {
                    table.add_row(vec![u.id.to_string(), u.name]);
                }
                print!("{}", table.render());
            }
        }

        if *categories || show_all {
            let rows = lookup::billing_categories(&ctx.backend, org_id)?;
            if rows.is_empty() {
                messages::info("No billing categories");
            } else {
                messages::header("Billing categories");
                let mut table = Table::new(vec![
                    Column { header: "Id".to_string(), width: 36 },
                    Column { header: "Name".to_string(), width: 24 },
                ]);
                for c in rows {
                    table.add_row(vec![c.id.to_string(), c.name]);
                }
                print!("{}", table.render());
            }
        }
    }

    Ok(())
}

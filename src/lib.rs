//! crewclock library root.
//! Exposes CLI parser, high-level run() function, and internal modules.

pub mod backend;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Status => cli::commands::status::handle(cfg),
        Commands::In => cli::commands::clock_in::handle(cfg),
        Commands::Out => cli::commands::clock_out::handle(cfg),
        Commands::Start { .. } => cli::commands::start::handle(&cli.command, cfg),
        Commands::End => cli::commands::end::handle(cfg),
        Commands::Endday => cli::commands::endday::handle(cfg),
        Commands::List { .. } => cli::commands::list::handle(&cli.command, cfg),
        Commands::Edit { .. } => cli::commands::edit::handle(&cli.command, cfg),
        Commands::Del { .. } => cli::commands::del::handle(&cli.command, cfg),
        Commands::Lookup { .. } => cli::commands::lookup::handle(&cli.command, cfg),
        Commands::Track { .. } => cli::commands::track::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1. parse CLI
    let cli = Cli::parse();

    // 2. diagnostics to stderr, controlled by RUST_LOG
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    // 3. load config ONCE
    let mut cfg = Config::load();

    // 4. apply the store override from the command line
    if let Some(custom_store) = &cli.store {
        cfg.store = custom_store.clone();
    }

    // 5. hand everything to the dispatcher
    dispatch(&cli, &cfg)
}

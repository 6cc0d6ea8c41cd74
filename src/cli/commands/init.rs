use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::Store;
use crate::store::log;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file
///  - the local sqlite store (prod or test mode)
pub fn handle(cli: &Cli) -> AppResult<()> {
    if let Some(custom) = &cli.store {
        Config::init_all(Some(custom.clone()), cli.test)?;
    } else {
        Config::init_all(None, cli.test)?;
    }

    let path = Config::config_file();
    let mut cfg = Config::load();
    if let Some(custom) = &cli.store {
        cfg.store = custom.clone();
    }

    println!("⚙️  Initializing crewclock…");
    println!("📄 Config file : {}", path.display());
    println!("🗄️  Local store : {}", &cfg.store);

    let store = Store::open(&cfg.store)?;

    println!("✅ Local store initialized at {}", &cfg.store);

    // internal log (non-blocking)
    if let Err(e) = log::audit(
        &store,
        "init",
        "Store initialized",
        &format!("Local store initialized at {}", &cfg.store),
    ) {
        eprintln!("⚠️ Failed to write operation log: {}", e);
    }

    println!("🎉 crewclock initialization completed!");
    println!("   Fill in backend_url, api_key and your account credentials in the config file.");
    Ok(())
}

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod migrate;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the time-tracking backend (REST + rpc routes).
    pub backend_url: String,
    /// Project api key sent with every request.
    pub api_key: String,
    /// Bearer token of the signed-in account.
    #[serde(default)]
    pub access_token: String,
    /// Account id of the signed-in user (uuid).
    #[serde(default)]
    pub account_id: String,
    /// Email of the signed-in user, used by the employee fallback lookup.
    #[serde(default)]
    pub email: String,
    /// Path of the local sqlite store (active ids, permissions, audit log).
    pub store: String,
    /// Whether a property and billing category are mandatory to start a job.
    /// Deployment policy; the backend may enforce its own version of it.
    #[serde(default)]
    pub require_job_refs: bool,
}

impl Default for Config {
    fn default() -> Self {
        let store_path = Self::store_file();
        Self {
            backend_url: "https://backend.example.com".to_string(),
            api_key: String::new(),
            access_token: String::new(),
            account_id: String::new(),
            email: String::new(),
            store: store_path.to_string_lossy().to_string(),
            require_job_refs: false,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("crewclock")
        } else if let Some(home) = dirs::home_dir() {
            home.join(".crewclock")
        } else {
            PathBuf::from(".crewclock")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("crewclock.conf")
    }

    /// Return the full path of the local sqlite store
    pub fn store_file() -> PathBuf {
        Self::config_dir().join("crewclock.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path).expect("❌ Failed to read configuration file");
            serde_yaml::from_str(&content).expect("❌ Failed to parse configuration file")
        } else {
            Config::default()
        }
    }

    /// True once the account credentials have been filled in.
    pub fn is_signed_in(&self) -> bool {
        !self.account_id.trim().is_empty() && !self.email.trim().is_empty()
    }

    /// Initialize configuration and the local store file
    pub fn init_all(custom_store: Option<String>, is_test: bool) -> io::Result<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // Store path: user provided or default
        let store_path = if let Some(name) = custom_store {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::store_file()
        };

        let config = Config {
            store: store_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| io::Error::other(e.to_string()))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty store file if not exists
        if !store_path.exists() {
            fs::File::create(&store_path)?;
        }

        println!("✅ Local store: {:?}", store_path);

        Ok(())
    }
}

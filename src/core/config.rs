use crate::storage::SeedUser;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_journal_path")]
    pub journal_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_locker_count")]
    pub locker_count: u32,
    #[serde(default = "default_lockers_per_row")]
    pub lockers_per_row: u32,
    #[serde(default = "default_seed_users")]
    pub users: Vec<SeedUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Whether a login with an unseen rfid creates the account on the fly
    #[serde(default = "default_auto_register")]
    pub auto_register: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

// Default value functions
fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_journal_path() -> PathBuf {
    PathBuf::from("lockerd.journal")
}

fn default_locker_count() -> u32 {
    50
}

fn default_lockers_per_row() -> u32 {
    10
}

fn default_seed_users() -> Vec<SeedUser> {
    vec![
        SeedUser {
            rfid: "12345".to_string(),
            pin: "1234".to_string(),
            name: "Demo User".to_string(),
        },
        SeedUser {
            rfid: "admin".to_string(),
            pin: "admin".to_string(),
            name: "Admin User".to_string(),
        },
    ]
}

fn default_auto_register() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_console() -> bool {
    false
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            journal_path: default_journal_path(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            locker_count: default_locker_count(),
            lockers_per_row: default_lockers_per_row(),
            users: default_seed_users(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auto_register: default_auto_register(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: default_console(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("Server port must be greater than 0");
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        if self.seed.locker_count == 0 {
            bail!("locker_count must be greater than 0");
        }

        if self.seed.lockers_per_row == 0 {
            bail!("lockers_per_row must be greater than 0");
        }

        let mut seen_rfids = HashSet::new();
        for account in &self.seed.users {
            if account.rfid.is_empty() {
                bail!("Seed user rfid must not be empty");
            }
            if !seen_rfids.insert(account.rfid.as_str()) {
                bail!("Duplicate seed user rfid '{}'", account.rfid);
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}

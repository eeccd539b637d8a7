//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Costs bcrypt accepts
pub const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

/// Session lifetimes that stay well inside the timestamp range
pub const SESSION_LIFETIME_DAYS_RANGE: RangeInclusive<i64> = 1..=36_500;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Instance folder holding the config file and, by default, the database.
    /// Never read from the file itself.
    #[serde(skip)]
    pub instance_path: PathBuf,
}

impl Config {
    /// Create a default configuration rooted at an instance folder
    pub fn with_instance(instance_path: impl Into<PathBuf>) -> Self {
        Self {
            instance_path: instance_path.into(),
            ..Self::default()
        }
    }

    /// Reject values that would make every login or registration fail
    pub fn validate(&self) -> Result<()> {
        if !SESSION_LIFETIME_DAYS_RANGE.contains(&self.app.session_lifetime_days) {
            return Err(Error::Config(format!(
                "app.session_lifetime_days must be between {} and {}, got {}",
                SESSION_LIFETIME_DAYS_RANGE.start(),
                SESSION_LIFETIME_DAYS_RANGE.end(),
                self.app.session_lifetime_days
            )));
        }
        if !BCRYPT_COST_RANGE.contains(&self.app.bcrypt_cost) {
            return Err(Error::Config(format!(
                "app.bcrypt_cost must be between {} and {}, got {}",
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end(),
                self.app.bcrypt_cost
            )));
        }
        Ok(())
    }

    /// Resolve the database file, relative paths land in the instance folder
    pub fn database_path(&self) -> PathBuf {
        resolve(&self.instance_path, &self.app.database)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Key used to sign session cookies
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    #[serde(default = "default_database")]
    pub database: PathBuf,

    #[serde(default = "default_session_lifetime_days")]
    pub session_lifetime_days: i64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

/// Insecure development default, override it when deploying
fn default_secret_key() -> String {
    "dev".to_string()
}

fn default_database() -> PathBuf {
    PathBuf::from("flaskr.sqlite")
}

fn default_session_lifetime_days() -> i64 {
    31
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
            database: default_database(),
            session_lifetime_days: default_session_lifetime_days(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

/// Server configuration for the HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

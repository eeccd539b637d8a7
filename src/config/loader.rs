//! Configuration loading and environment variable interpolation

use crate::error::Result;
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

pub const CONFIG_FILENAME: &str = "config.toml";

/// Load configuration for an instance folder.
///
/// A missing `config.toml` yields the defaults, a malformed one is an error.
pub fn load_config(instance_path: &Path) -> Result<Config> {
    let config_path = instance_path.join(CONFIG_FILENAME);
    let mut config = if config_path.exists() {
        load_config_from_path(&config_path)?
    } else {
        tracing::debug!("No config at {}, using defaults", config_path.display());
        Config::default()
    };
    config.instance_path = instance_path.to_path_buf();
    Ok(config)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Write the default configuration into an instance folder.
/// Returns `false` when a config file already exists.
pub fn save_default_config(instance_path: &Path) -> Result<bool> {
    let config_path = instance_path.join(CONFIG_FILENAME);
    if config_path.exists() {
        return Ok(false);
    }
    fs::create_dir_all(instance_path)?;
    fs::write(&config_path, default_config_content())?;
    Ok(true)
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# flaskr instance configuration

[app]
# Used to sign session cookies. Replace with a long random value when deploying.
secret_key = "${FLASKR_SECRET_KEY:-dev}"
# Relative paths are resolved inside the instance folder
database = "flaskr.sqlite"
session_lifetime_days = 31
bcrypt_cost = 12

[server]
host = "127.0.0.1"
port = 5000
"#
}

//! CLI command implementations

use anyhow::Result;
use std::path::Path;

use crate::cli::{error, info, success, warn};
use crate::config::{self, Config};
use crate::db::Database;

/// Write a default config.toml into the instance folder
pub async fn init(instance: &Path) -> Result<()> {
    if !config::save_default_config(instance)? {
        warn(&format!(
            "{} already exists",
            instance.join(config::loader::CONFIG_FILENAME).display()
        ));
        return Ok(());
    }

    success(&format!(
        "Created {}",
        instance.join(config::loader::CONFIG_FILENAME).display()
    ));
    info("Set app.secret_key, then run 'flaskr init-db' to create the database");

    Ok(())
}

/// Clear the existing data and create new tables
pub async fn init_db(config: &Config) -> Result<()> {
    let db = Database::new(config.database_path());

    match db.init_db() {
        Ok(()) => {
            success("Initialized the database.");
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to initialize the database: {}", e));
            Err(e.into())
        }
    }
}

/// Start the HTTP server
pub async fn serve(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server at http://{}:{}", host, port));

    crate::api::run_server(config, &host, port).await?;
    Ok(())
}

//! CLI interface for flaskr

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{self, Config};
use crate::error::Result;

#[derive(Parser)]
#[command(name = "flaskr")]
#[command(version)]
#[command(about = "A small blog with user accounts", long_about = None)]
pub struct Cli {
    /// Instance folder holding config.toml and, by default, the database
    #[arg(long, global = true, env = "FLASKR_INSTANCE", default_value = "instance")]
    pub instance: PathBuf,

    /// Database file, overrides `app.database` from the config
    #[arg(long, global = true, env = "FLASKR_DATABASE")]
    pub database: Option<PathBuf>,

    /// Session signing key, overrides `app.secret_key` from the config
    #[arg(long, global = true, env = "FLASKR_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load the instance config and apply command line overrides
    pub fn config(&self) -> Result<Config> {
        let mut config = config::load_config(&self.instance)?;
        if let Some(database) = &self.database {
            config.app.database = database.clone();
        }
        if let Some(secret_key) = &self.secret_key {
            config.app.secret_key = secret_key.clone();
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config.toml into the instance folder
    Init,

    /// Clear the existing data and create new tables
    InitDb,

    /// Start the web server
    Serve {
        /// Host to bind to (defaults to server.host from the config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to server.port from the config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

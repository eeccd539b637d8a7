//! flaskr - a small blog with user accounts
//!
//! This is the library interface for flaskr: the application factory,
//! configuration, database access and the CLI commands built on them.

pub mod api;
pub mod auth;
pub mod blog;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod ui;

pub use api::create_app;
pub use config::Config;
pub use error::{Error, Result};

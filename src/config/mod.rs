//! Configuration management for flaskr

pub mod loader;
mod schema;

pub use loader::{load_config, save_default_config};
pub use schema::*;

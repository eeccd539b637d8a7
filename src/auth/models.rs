//! Authentication models

use serde::Deserialize;

use crate::auth::password::MAX_PASSWORD_BYTES;

pub use crate::db::User;

/// Submitted register/login form. Missing fields count as empty.
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    /// First registration problem, checked in order: username, password.
    /// Uniqueness needs the database and is checked by the caller.
    pub fn validate(&self) -> Option<&'static str> {
        if self.username.is_empty() {
            Some("Username is required.")
        } else if self.password.is_empty() {
            Some("Password is required.")
        } else if self.password.len() > MAX_PASSWORD_BYTES {
            Some("Password must be at most 72 bytes.")
        } else {
            None
        }
    }
}

pub fn already_registered(username: &str) -> String {
    format!("User {} is already registered.", username)
}

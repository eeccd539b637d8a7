//! Database row types. These map directly to SQLite rows and are handed
//! to templates as-is, so anything secret is kept out of serialization.

use chrono::NaiveDateTime;
use rusqlite::Row;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// bcrypt hash, never the plaintext
    #[serde(skip_serializing)]
    pub password: String,
}

impl User {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            password: row.get("password")?,
        })
    }
}

/// A post joined with its author's username
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub created: NaiveDateTime,
    pub author_id: i64,
    pub username: String,
}

impl Post {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            body: row.get("body")?,
            created: row.get("created")?,
            author_id: row.get("author_id")?,
            username: row.get("username")?,
        })
    }
}

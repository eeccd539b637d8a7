use rusqlite::{Connection, ErrorCode, OptionalExtension};

use super::models::{Post, User};

const POST_COLUMNS: &str = "SELECT p.id, p.title, p.body, p.created, p.author_id, u.username \
     FROM post p JOIN user u ON p.author_id = u.id";

// -- Users --

/// Insert a user. Returns `None` when the username is already taken.
pub fn create_user(conn: &Connection, username: &str, password_hash: &str) -> rusqlite::Result<Option<i64>> {
    match conn.execute(
        "INSERT INTO user (username, password) VALUES (?1, ?2)",
        (username, password_hash),
    ) {
        Ok(_) => Ok(Some(conn.last_insert_rowid())),
        Err(e) if is_constraint_violation(&e) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn username_exists(conn: &Connection, username: &str) -> rusqlite::Result<bool> {
    conn.query_row("SELECT 1 FROM user WHERE username = ?1", [username], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
}

pub fn get_user_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, username, password FROM user WHERE username = ?1",
        [username],
        User::from_row,
    )
    .optional()
}

pub fn get_user_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, username, password FROM user WHERE id = ?1",
        [id],
        User::from_row,
    )
    .optional()
}

// -- Posts --

/// All posts, newest first
pub fn list_posts(conn: &Connection) -> rusqlite::Result<Vec<Post>> {
    let mut stmt = conn.prepare(&format!(
        "{POST_COLUMNS} ORDER BY p.created DESC, p.id DESC"
    ))?;
    let posts = stmt
        .query_map([], Post::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(posts)
}

pub fn get_post(conn: &Connection, id: i64) -> rusqlite::Result<Option<Post>> {
    conn.query_row(&format!("{POST_COLUMNS} WHERE p.id = ?1"), [id], Post::from_row)
        .optional()
}

pub fn create_post(conn: &Connection, title: &str, body: &str, author_id: i64) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO post (title, body, author_id) VALUES (?1, ?2, ?3)",
        (title, body, author_id),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_post(conn: &Connection, id: i64, title: &str, body: &str) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE post SET title = ?1, body = ?2 WHERE id = ?3",
        (title, body, id),
    )?;
    Ok(())
}

pub fn delete_post(conn: &Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM post WHERE id = ?1", [id])?;
    Ok(())
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

//! One-way salted password hashing

use crate::error::Result;

/// bcrypt only looks at this many bytes of a password
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password with a fresh random salt. Passwords longer than
/// [`MAX_PASSWORD_BYTES`] are an error rather than silently truncated.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    Ok(bcrypt::non_truncating_hash(password, cost)?)
}

/// Check a submitted password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    // Stored hashes never come from an over-long password
    if password.len() > MAX_PASSWORD_BYTES {
        return Ok(false);
    }
    Ok(bcrypt::non_truncating_verify(password, hash)?)
}

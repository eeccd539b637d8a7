//! Session management
//!
//! The session lives entirely on the client: a cookie holding a token signed
//! with the application's secret key. Its only application field is the
//! logged-in user's id.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Per-client session state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<i64>,
}

impl Session {
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn clear(&mut self) {
        self.user_id = None;
    }

    /// Reset the session so it holds nothing but `user_id`
    pub fn log_in(&mut self, user_id: i64) {
        self.clear();
        self.user_id = Some(user_id);
    }
}

/// Signed token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub user_id: i64,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// Signs sessions into cookies and reads them back
#[derive(Clone)]
pub struct SessionManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: chrono::Duration,
}

impl SessionManager {
    pub fn new(secret_key: &str, lifetime_days: i64) -> Result<Self> {
        let lifetime = chrono::Duration::try_days(lifetime_days).ok_or_else(|| {
            Error::Config(format!("session lifetime of {} days is out of range", lifetime_days))
        })?;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret_key.as_bytes()),
            decoding: DecodingKey::from_secret(secret_key.as_bytes()),
            lifetime,
        })
    }

    /// Sign a session. An empty session has no token.
    pub fn encode(&self, session: &Session) -> Result<Option<String>> {
        let Some(user_id) = session.user_id else {
            return Ok(None);
        };
        let now = chrono::Utc::now();
        let expires = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| Error::Config("session expiry overflows".to_string()))?;
        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        Ok(Some(encode(&Header::default(), &claims, &self.encoding)?))
    }

    /// Verify a token and recover its session
    pub fn decode(&self, token: &str) -> Result<Session> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(Session {
            user_id: Some(data.claims.user_id),
        })
    }

    /// Read the session from the request cookies. Missing, expired or
    /// tampered cookies all yield an empty session.
    pub fn load(&self, jar: &CookieJar) -> Session {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Session::default();
        };
        match self.decode(cookie.value()) {
            Ok(session) => session,
            Err(e) => {
                debug!("Ignoring invalid session cookie: {}", e);
                Session::default()
            }
        }
    }

    /// Write the session into the response cookies, removing the cookie
    /// when the session is empty
    pub fn store(&self, jar: CookieJar, session: &Session) -> Result<CookieJar> {
        match self.encode(session)? {
            Some(token) => Ok(jar.add(
                Cookie::build((SESSION_COOKIE, token))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax),
            )),
            None => Ok(jar.remove(Cookie::build(SESSION_COOKIE).path("/"))),
        }
    }
}

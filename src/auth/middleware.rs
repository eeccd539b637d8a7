//! Authentication middleware and extractors

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::api::SharedState;
use crate::auth::{Session, User};
use crate::db::{queries, RequestDb};
use crate::error::{Error, Result};

/// Everything a handler knows about the current request: who is logged in,
/// the session it came with, and the request's database connection.
#[derive(Clone)]
pub struct RequestContext {
    pub user: Option<User>,
    pub session: Session,
    pub db: RequestDb,
}

impl RequestContext {
    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|user| user.id)
    }

    /// The logged-in user, for handlers behind [`require_login`]
    pub fn require_user(&self) -> Result<&User> {
        self.user.as_ref().ok_or(Error::Forbidden)
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| Error::Other("request context missing".to_string()))
    }
}

/// Resolve the session's user before every request and close the request's
/// connection once the response is ready. A missing or stale user id means
/// nobody is logged in.
pub async fn load_logged_in_user(
    State(state): State<SharedState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let session = state.sessions.load(&jar);
    let db = RequestDb::new(state.db.clone());

    let user = match session.user_id() {
        Some(user_id) => {
            let user = db.with_conn(|conn| queries::get_user_by_id(conn, user_id))?;
            if user.is_none() {
                debug!("Session refers to unknown user {}", user_id);
            }
            user
        }
        None => None,
    };

    req.extensions_mut().insert(RequestContext {
        user,
        session,
        db: db.clone(),
    });

    let response = next.run(req).await;
    db.close();
    Ok(response)
}

/// Redirect anonymous requests to the login page instead of running the handler
pub async fn require_login(ctx: RequestContext, req: Request, next: Next) -> Response {
    if ctx.user.is_none() {
        return Redirect::to("/auth/login").into_response();
    }
    next.run(req).await
}

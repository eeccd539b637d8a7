//! Register, login and logout pages

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use crate::api::SharedState;
use crate::auth::{already_registered, password, Credentials, RequestContext};
use crate::db::queries;
use crate::error::Result;

const REGISTER_TEMPLATE: &str = "auth/register.html";
const LOGIN_TEMPLATE: &str = "auth/login.html";

pub async fn register_form(
    State(state): State<SharedState>,
    ctx: RequestContext,
) -> Result<Html<String>> {
    state.templates.render(REGISTER_TEMPLATE, &ctx, &[], &[])
}

pub async fn register(
    State(state): State<SharedState>,
    ctx: RequestContext,
    Form(form): Form<Credentials>,
) -> Result<Response> {
    let error = match form.validate() {
        Some(message) => message.to_string(),
        None if ctx.db.with_conn(|conn| queries::username_exists(conn, &form.username))? => {
            already_registered(&form.username)
        }
        None => {
            let hash = password::hash_password(&form.password, state.config.app.bcrypt_cost)?;
            match ctx.db.with_conn(|conn| queries::create_user(conn, &form.username, &hash))? {
                Some(user_id) => {
                    info!("Registered user {} ({})", form.username, user_id);
                    return Ok(Redirect::to("/auth/login").into_response());
                }
                // Lost a race with a concurrent registration
                None => already_registered(&form.username),
            }
        }
    };

    let page = state
        .templates
        .render(REGISTER_TEMPLATE, &ctx, &[error], &[])?;
    Ok(page.into_response())
}

pub async fn login_form(
    State(state): State<SharedState>,
    ctx: RequestContext,
) -> Result<Html<String>> {
    state.templates.render(LOGIN_TEMPLATE, &ctx, &[], &[])
}

/// Check credentials and, on success, start a fresh session for the user.
/// Failed attempts leave the session cookie untouched.
pub async fn login(
    State(state): State<SharedState>,
    ctx: RequestContext,
    jar: CookieJar,
    Form(form): Form<Credentials>,
) -> Result<Response> {
    let user = ctx
        .db
        .with_conn(|conn| queries::get_user_by_username(conn, &form.username))?;

    let error = match &user {
        None => Some("Incorrect username."),
        Some(user) if !password::verify_password(&form.password, &user.password)? => {
            Some("Incorrect password.")
        }
        Some(_) => None,
    };

    match (user, error) {
        (Some(user), None) => {
            let mut session = ctx.session.clone();
            session.log_in(user.id);
            let jar = state.sessions.store(jar, &session)?;
            info!("User {} logged in", user.username);
            Ok((jar, Redirect::to("/")).into_response())
        }
        (_, error) => {
            let messages: Vec<String> = error.into_iter().map(String::from).collect();
            let page = state
                .templates
                .render(LOGIN_TEMPLATE, &ctx, &messages, &[])?;
            Ok(page.into_response())
        }
    }
}

pub async fn logout(
    State(state): State<SharedState>,
    ctx: RequestContext,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let mut session = ctx.session.clone();
    session.clear();
    let jar = state.sessions.store(jar, &session)?;
    Ok((jar, Redirect::to("/")))
}

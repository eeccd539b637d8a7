//! Application factory and HTTP server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::fs;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::{self, SessionManager};
use crate::blog;
use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::ui::Templates;

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub sessions: SessionManager,
    pub templates: Templates,
}

pub type SharedState = Arc<AppState>;

/// Build the application: make sure the instance folder exists, then wire
/// state, routes and middleware together.
pub fn create_app(config: Config) -> Result<Router> {
    config.validate()?;
    fs::create_dir_all(&config.instance_path)?;

    if config.app.secret_key == "dev" {
        tracing::warn!("Using the development secret key, set app.secret_key before deploying");
    }

    let db = Database::new(config.database_path());
    let sessions = SessionManager::new(&config.app.secret_key, config.app.session_lifetime_days)?;

    let state = Arc::new(AppState {
        config,
        db,
        sessions,
        templates: Templates::new(),
    });

    Ok(create_router(state))
}

/// Run the HTTP server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    tracing::info!("Using database {}", config.database_path().display());
    let app = create_app(config)?;

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
fn create_router(state: SharedState) -> Router {
    // Only reachable with a logged-in user
    let protected = Router::new()
        .route("/create", get(blog::handlers::create_form).post(blog::handlers::create))
        .route(
            "/{id}/update",
            get(blog::handlers::update_form).post(blog::handlers::update),
        )
        .route("/{id}/delete", post(blog::handlers::delete))
        .route_layer(middleware::from_fn(auth::require_login));

    Router::new()
        .route("/", get(blog::handlers::index))
        .route("/{id}", get(blog::handlers::detail))
        .route("/hello", get(routes::hello))
        .route("/static/{*path}", get(routes::static_asset))
        .route(
            "/auth/register",
            get(auth::handlers::register_form).post(auth::handlers::register),
        )
        .route(
            "/auth/login",
            get(auth::handlers::login_form).post(auth::handlers::login),
        )
        .route("/auth/logout", get(auth::handlers::logout))
        .merge(protected)
        // Middleware
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::load_logged_in_user,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Authentication and session management

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod session;

pub use middleware::{load_logged_in_user, require_login, RequestContext};
pub use models::{already_registered, Credentials, User};
pub use session::{Session, SessionManager, SESSION_COOKIE};

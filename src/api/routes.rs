//! Routes outside the auth and blog sections

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::ui;

pub async fn hello() -> &'static str {
    "Hello, World!"
}

pub async fn static_asset(Path(path): Path<String>) -> Response {
    match ui::asset(&path) {
        Some((content_type, body)) => ([(header::CONTENT_TYPE, content_type)], body).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

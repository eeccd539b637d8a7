//! Shared helpers for driving the app in process
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use axum_extra::extract::cookie::Cookie;
use flaskr::auth::SESSION_COOKIE;
use flaskr::db::Database;
use flaskr::{create_app, Config};
use tempfile::TempDir;
use tower::ServiceExt;

/// A fresh app on a temporary database, plus a one-cookie browser
pub struct TestApp {
    pub router: Router,
    pub db: Database,
    pub cookie: Option<String>,
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookie: Vec<String>,
    pub body: String,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut config = Config::with_instance(dir.path());
        config.app.secret_key = "test-secret".to_string();
        config.app.bcrypt_cost = 4;

        let db = Database::new(config.database_path());
        db.init_db().expect("Failed to init db");

        let router = create_app(config).expect("Failed to create app");

        Self {
            router,
            db,
            cookie: None,
            _dir: dir,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(serde_urlencoded::to_string(form).unwrap()))
            .unwrap();
        self.send(request).await
    }

    pub async fn register(&mut self, username: &str, password: &str) -> TestResponse {
        self.post(
            "/auth/register",
            &[("username", username), ("password", password)],
        )
        .await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        self.post("/auth/login", &[("username", username), ("password", password)])
            .await
    }

    /// Register and log in, panicking if either step fails
    pub async fn sign_up(&mut self, username: &str, password: &str) {
        let response = self.register(username, password).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "register {}", username);
        let response = self.login(username, password).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "login {}", username);
        assert!(self.cookie.is_some());
    }

    /// Create a post as the current user and return its id
    pub async fn create_post(&mut self, title: &str, body: &str) -> i64 {
        let response = self.post("/create", &[("title", title), ("body", body)]).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        let conn = self.db.connect().unwrap();
        conn.query_row("SELECT MAX(id) FROM post", [], |row| row.get(0))
            .unwrap()
    }

    /// Drop the session cookie, like a fresh browser
    pub fn forget_session(&mut self) {
        self.cookie = None;
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let set_cookie: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();

        for cookie in &set_cookie {
            self.apply_set_cookie(cookie);
        }

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            location,
            set_cookie,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn apply_set_cookie(&mut self, set_cookie: &str) {
        let Some(cookie) = parse_session_cookie(set_cookie) else {
            return;
        };
        if is_removal(&cookie) {
            self.cookie = None;
        } else {
            self.cookie = Some(format!("{}={}", cookie.name(), cookie.value()));
        }
    }
}

impl TestResponse {
    pub fn sets_session(&self) -> bool {
        self.set_cookie
            .iter()
            .any(|c| parse_session_cookie(c).is_some())
    }

    pub fn clears_session(&self) -> bool {
        self.set_cookie
            .iter()
            .filter_map(|c| parse_session_cookie(c))
            .any(|cookie| is_removal(&cookie))
    }
}

fn parse_session_cookie(set_cookie: &str) -> Option<Cookie<'_>> {
    Cookie::parse(set_cookie)
        .ok()
        .filter(|cookie| cookie.name() == SESSION_COOKIE)
}

fn is_removal(cookie: &Cookie<'_>) -> bool {
    cookie.value().is_empty() || cookie.max_age().is_some_and(|age| age.is_zero())
}

//! Application factory, static routes and database setup tests

mod common;

use axum::http::StatusCode;
use common::TestApp;
use flaskr::db::Database;
use flaskr::{create_app, Config};
use tempfile::TempDir;

#[tokio::test]
async fn test_hello() {
    let mut app = TestApp::new();
    let response = app.get("/hello").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "Hello, World!");
}

#[tokio::test]
async fn test_stylesheet_is_served() {
    let mut app = TestApp::new();
    let response = app.get("/static/style.css").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(".flash"));

    assert_eq!(app.get("/static/missing.css").await.status, StatusCode::NOT_FOUND);
}

#[test]
fn test_create_app_makes_instance_folder() {
    let dir = TempDir::new().unwrap();
    let instance = dir.path().join("instance");
    assert!(!instance.exists());

    create_app(Config::with_instance(&instance)).expect("app builds");
    assert!(instance.is_dir());

    // Already existing is fine
    create_app(Config::with_instance(&instance)).expect("app builds again");
}

#[test]
fn test_create_app_rejects_out_of_range_settings() {
    let dir = TempDir::new().unwrap();

    let mut config = Config::with_instance(dir.path());
    config.app.session_lifetime_days = i64::MAX;
    assert!(create_app(config).is_err());

    let mut config = Config::with_instance(dir.path());
    config.app.bcrypt_cost = 40;
    assert!(create_app(config).is_err());
}

#[test]
fn test_init_db_uses_configured_path() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::with_instance(dir.path());
    config.app.database = "blog.sqlite".into();

    Database::new(config.database_path()).init_db().unwrap();
    assert!(dir.path().join("blog.sqlite").exists());
}

#[tokio::test]
async fn test_non_numeric_post_id_is_not_found() {
    let mut app = TestApp::new();
    app.sign_up("alice", "pw1").await;

    for uri in ["/abc", "/abc/update", "/favicon.ico", "/99999999999999999999"] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "GET {}", uri);
    }
    let response = app.post("/abc/delete", &[]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let response = app.post("/abc/update", &[("title", "x")]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use tower::ServiceExt;

use reelrate::{AppState, app, cache::ResponseCache, config::Config, tmdb::TmdbClient};

pub const TEST_SECRET: &str = "test-secret-key";

/// Fresh router over an in-memory database with migrations applied. The
/// database handle is returned alongside so tests can assert on rows
/// directly.
pub async fn test_app() -> (Router, DatabaseConnection) {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1);
    let db = Database::connect(opts).await.expect("connect in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");

    let config = Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        tmdb_api_key: "test-key".to_string(),
        // Nothing listens here; metadata endpoints are not exercised in
        // these suites.
        tmdb_base_url: "http://127.0.0.1:9".to_string(),
        cache_default_ttl_secs: 300,
        search_cache_ttl_secs: 86_400,
        http_timeout_secs: 1,
    };

    let http = reqwest::Client::builder().timeout(Duration::from_secs(1)).build().unwrap();
    let tmdb = TmdbClient::new(http, config.tmdb_api_key.clone(), config.tmdb_base_url.clone());

    let state = Arc::new(AppState {
        config: Arc::new(config),
        db: db.clone(),
        cache: ResponseCache::new(1_000),
        tmdb: Arc::new(tmdb),
    });

    (app(state), db)
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn register_and_login(app: &Router, email: &str) -> String {
    let (status, _) = send_json(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": email, "password": "password" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": "password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the full application router with the same middleware stack the
//! production binary uses, plus request/response helpers around
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use apiforge_api::auth::jwt::JwtConfig;
use apiforge_api::auth::revocation::InMemoryRevocationStore;
use apiforge_api::auth::TokenManager;
use apiforge_api::config::ServerConfig;
use apiforge_api::router::build_app_router;
use apiforge_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and fixed JWT secrets.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 90,
        jwt: JwtConfig {
            access_secret: "integration-test-access-secret".to_string(),
            refresh_secret: "integration-test-refresh-secret".to_string(),
            access_expiry_mins: 15,
            refresh_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool and an in-memory revocation store.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let tokens = Arc::new(TokenManager::new(
        config.jwt.clone(),
        Arc::new(InMemoryRevocationStore::new()),
    ));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        tokens,
        http: reqwest::Client::new(),
    };
    build_app_router(state, &config)
}

/// Dispatch a GET request.
pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Dispatch a GET request with a bearer token.
pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Dispatch a JSON request with the given method and no auth.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Dispatch a JSON request with the given method and a bearer token.
pub async fn send_json_auth(
    app: &Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Dispatch a POST request with a JSON body.
pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, "POST", uri, body).await
}

/// Dispatch a POST request with a JSON body and a bearer token.
pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send_json_auth(app, "POST", uri, body, token).await
}

/// Dispatch a PUT request with a JSON body and a bearer token.
pub async fn put_json_auth(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send_json_auth(app, "PUT", uri, body, token).await
}

/// Dispatch a DELETE request with a bearer token.
pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be valid JSON")
}

/// Register a user via the API and return the JSON response containing
/// `accessToken`, `refreshToken`, and `user` info.
pub async fn register_user(app: &Router, email: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": password, "name": "Test User" });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Log in a user via the API and return the JSON response.
pub async fn login_user(app: &Router, email: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

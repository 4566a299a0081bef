//! HTTP-level integration tests for environments.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, put_json_auth, register_user};
use sqlx::PgPool;

/// Create an environment via the API and return its JSON.
async fn create_environment(
    app: &axum::Router,
    token: &str,
    name: &str,
    active: bool,
) -> serde_json::Value {
    let body = serde_json::json!({
        "name": name,
        "variables": { "BASE_URL": "https://api.example.com" },
        "is_active": active,
    });
    let response = post_json_auth(app, "/api/v1/environments", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// At most one environment per user is active: activating one deactivates
/// the rest.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_single_active_environment(pool: PgPool) {
    let app = common::build_test_app(pool);
    let login = register_user(&app, "envuser@example.com", "secret_password").await;
    let token = login["accessToken"].as_str().unwrap();

    let staging = create_environment(&app, token, "staging", true).await;
    let production = create_environment(&app, token, "production", false).await;
    assert_eq!(staging["is_active"], true);
    assert_eq!(production["is_active"], false);

    // Activate production; staging must flip off.
    let body = serde_json::json!({ "is_active": true });
    let response = put_json_auth(
        &app,
        &format!("/api/v1/environments/{}", production["id"]),
        body,
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(&app, "/api/v1/environments", token).await;
    let json = body_json(response).await;
    let environments = json.as_array().unwrap();
    let active: Vec<_> = environments
        .iter()
        .filter(|e| e["is_active"] == true)
        .collect();
    assert_eq!(active.len(), 1, "exactly one active environment");
    assert_eq!(active[0]["name"], "production");
}

/// Creating a second active environment also steals the active flag.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_active_environment_deactivates_others(pool: PgPool) {
    let app = common::build_test_app(pool);
    let login = register_user(&app, "switcher@example.com", "secret_password").await;
    let token = login["accessToken"].as_str().unwrap();

    create_environment(&app, token, "first", true).await;
    create_environment(&app, token, "second", true).await;

    let response = get_auth(&app, "/api/v1/environments", token).await;
    let json = body_json(response).await;
    let active: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["is_active"] == true)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["name"], "second");
}

/// Variables round-trip through update.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_environment_variables_update(pool: PgPool) {
    let app = common::build_test_app(pool);
    let login = register_user(&app, "vars@example.com", "secret_password").await;
    let token = login["accessToken"].as_str().unwrap();

    let environment = create_environment(&app, token, "dev", false).await;
    let id = environment["id"].as_i64().unwrap();

    let body = serde_json::json!({
        "variables": { "BASE_URL": "http://localhost:5000", "API_KEY": "dev-key" }
    });
    let response = put_json_auth(&app, &format!("/api/v1/environments/{id}"), body, token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["variables"]["API_KEY"], "dev-key");
    assert_eq!(json["name"], "dev", "untouched fields persist");
}

//! HTTP-level integration tests for the auth endpoints.
//!
//! Tests cover registration, login, token refresh, logout, the refresh
//! token FIFO cap, blacklisting, and password change.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, login_user, post_json, post_json_auth, put_json_auth, register_user};
use sqlx::PgPool;

use apiforge_db::repositories::RefreshTokenRepo;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Successful registration returns 201 with tokens and the public profile.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_success(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = register_user(&app, "new@example.com", "secret_password").await;

    assert!(json["accessToken"].is_string(), "response must contain accessToken");
    assert!(json["refreshToken"].is_string(), "response must contain refreshToken");
    assert_eq!(json["user"]["email"], "new@example.com");
    assert_eq!(json["user"]["name"], "Test User");
    assert!(
        json["user"].get("password_hash").is_none(),
        "password hash must never be serialized"
    );
}

/// Registering the same email twice returns 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(&app, "dup@example.com", "secret_password").await;

    let body = serde_json::json!({ "email": "dup@example.com", "password": "other_password" });
    let response = post_json(&app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

/// Emails are stored lowercase; registration is case-insensitive on the
/// duplicate check and login accepts any casing.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_email_case_insensitive(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(&app, "Mixed@Example.COM", "secret_password").await;

    let body = serde_json::json!({ "email": "mixed@example.com", "password": "whatever_pass" });
    let response = post_json(&app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = login_user(&app, "MIXED@example.com", "secret_password").await;
    assert_eq!(json["user"]["email"], "mixed@example.com");
}

/// A malformed email or short password is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_validation(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "not-an-email", "password": "secret_password" });
    let response = post_json(&app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({ "email": "ok@example.com", "password": "tiny" });
    let response = post_json(&app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns 200 with both tokens.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(&app, "login@example.com", "secret_password").await;

    let json = login_user(&app, "login@example.com", "secret_password").await;
    assert!(json["accessToken"].is_string());
    assert!(json["refreshToken"].is_string());
}

/// Wrong password and unknown email both return the same generic 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_bad_credentials(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(&app, "victim@example.com", "secret_password").await;

    let body = serde_json::json!({ "email": "victim@example.com", "password": "wrong_password" });
    let response = post_json(&app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_pw = body_json(response).await;

    let body = serde_json::json!({ "email": "ghost@example.com", "password": "whatever_pass" });
    let response = post_json(&app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let no_user = body_json(response).await;

    assert_eq!(
        wrong_pw["message"], no_user["message"],
        "bad-password and unknown-email responses must be identical"
    );
}

// ---------------------------------------------------------------------------
// Refresh / rotation
// ---------------------------------------------------------------------------

/// A valid refresh token mints a new access token without rotating the
/// refresh token itself.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_mints_access_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let login = register_user(&app, "refresher@example.com", "secret_password").await;
    let refresh_token = login["refreshToken"].as_str().unwrap();

    let body = serde_json::json!({ "refreshToken": refresh_token });
    let response = post_json(&app, "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let access_token = json["accessToken"].as_str().unwrap();

    // The minted access token works against a protected endpoint.
    let response = get_auth(&app, "/api/v1/auth/me", access_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The refresh token is still live: a second exchange also succeeds.
    let response = post_json(&app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// A missing refresh token returns 400; garbage returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rejects_missing_and_invalid(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(&app, "/api/v1/auth/refresh", serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({ "refreshToken": "not-a-real-token" });
    let response = post_json(&app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A user accumulates at most 5 refresh tokens; the 6th login evicts the
/// oldest, which then fails to refresh even though it still verifies
/// cryptographically.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_token_fifo_cap(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let first = register_user(&app, "hoarder@example.com", "secret_password").await;
    let first_refresh = first["refreshToken"].as_str().unwrap().to_string();
    let user_id = first["user"]["id"].as_i64().unwrap();

    // Five more logins fill the queue past capacity.
    let mut last_refresh = String::new();
    for _ in 0..5 {
        let login = login_user(&app, "hoarder@example.com", "secret_password").await;
        last_refresh = login["refreshToken"].as_str().unwrap().to_string();
    }

    let live = RefreshTokenRepo::list_for_user(&pool, user_id)
        .await
        .expect("listing refresh tokens should succeed");
    assert_eq!(live.len(), 5, "the queue must be capped at 5");

    // The evicted (oldest) token no longer refreshes.
    let body = serde_json::json!({ "refreshToken": first_refresh });
    let response = post_json(&app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The newest still does.
    let body = serde_json::json!({ "refreshToken": last_refresh });
    let response = post_json(&app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Logout / revocation
// ---------------------------------------------------------------------------

/// Logout blacklists the access token and revokes the presented refresh
/// token.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_both_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);
    let login = register_user(&app, "leaver@example.com", "secret_password").await;
    let access_token = login["accessToken"].as_str().unwrap();
    let refresh_token = login["refreshToken"].as_str().unwrap();

    let body = serde_json::json!({ "refreshToken": refresh_token });
    let response = post_json_auth(&app, "/api/v1/auth/logout", body, access_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The access token is structurally valid and unexpired, but
    // blacklisted: protected endpoints reject it with the generic 401.
    let response = get_auth(&app, "/api/v1/auth/me", access_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The refresh token was removed from the stored set.
    let body = serde_json::json!({ "refreshToken": refresh_token });
    let response = post_json(&app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout-all clears every refresh token for the user.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_all_clears_refresh_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(&app, "everywhere@example.com", "secret_password").await;
    let session_a = login_user(&app, "everywhere@example.com", "secret_password").await;
    let session_b = login_user(&app, "everywhere@example.com", "secret_password").await;

    let response = post_json_auth(
        &app,
        "/api/v1/auth/logout-all",
        serde_json::json!({}),
        session_b["accessToken"].as_str().unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    for session in [&session_a, &session_b] {
        let body = serde_json::json!({ "refreshToken": session["refreshToken"] });
        let response = post_json(&app, "/api/v1/auth/refresh", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

// ---------------------------------------------------------------------------
// Bearer enforcement
// ---------------------------------------------------------------------------

/// Missing, malformed, and forged tokens all produce the same generic 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_protected_endpoint_generic_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::get(&app, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let missing = body_json(response).await;

    let response = get_auth(&app, "/api/v1/auth/me", "garbage-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let garbage = body_json(response).await;

    assert_eq!(missing["success"], false);
    assert_eq!(
        missing["message"], garbage["message"],
        "failure modes must be indistinguishable"
    );
}

// ---------------------------------------------------------------------------
// Password change
// ---------------------------------------------------------------------------

/// Changing the password requires the current one and invalidates every
/// previously issued refresh token.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_change_password_clears_refresh_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);
    let login = register_user(&app, "rotator@example.com", "old_password").await;
    let access_token = login["accessToken"].as_str().unwrap();
    let old_refresh = login["refreshToken"].as_str().unwrap();

    // Wrong current password is rejected.
    let body = serde_json::json!({
        "currentPassword": "not_the_password",
        "newPassword": "brand_new_password"
    });
    let response = put_json_auth(&app, "/api/v1/auth/change-password", body, access_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct current password succeeds.
    let body = serde_json::json!({
        "currentPassword": "old_password",
        "newPassword": "brand_new_password"
    });
    let response = put_json_auth(&app, "/api/v1/auth/change-password", body, access_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Pre-change refresh tokens are dead.
    let body = serde_json::json!({ "refreshToken": old_refresh });
    let response = post_json(&app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The new password logs in; the old one does not.
    login_user(&app, "rotator@example.com", "brand_new_password").await;
    let body = serde_json::json!({ "email": "rotator@example.com", "password": "old_password" });
    let response = post_json(&app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

//! Handlers for the `/auth` resource (register, login, refresh, logout,
//! profile, password change).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use apiforge_core::error::CoreError;
use apiforge_db::models::user::{CreateUser, UpdateProfile, User, UserProfile};
use apiforge_db::repositories::{RefreshTokenRepo, UserRepo};

use crate::auth::jwt::hash_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(max = 50, message = "Name cannot exceed 50 characters"))]
    pub name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh` and `POST /auth/logout`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenBody {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Request body for `PUT /auth/change-password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

/// Response for `POST /auth/refresh`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Plain message acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a new account and sign the user in.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let email = input.email.trim().to_lowercase();

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "User with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            email,
            password_hash,
        },
    )
    .await?;

    let response = create_auth_response(&state, &user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for a new access token. The refresh
/// token itself is not rotated: it stays usable until revoked or expired.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshTokenBody>,
) -> AppResult<Json<RefreshResponse>> {
    let token = input
        .refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Refresh token is required".into()))?;

    let identity = state.tokens.verify_refresh(&token)?;

    let user = UserRepo::find_by_id(&state.pool, identity.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidRefreshToken("Invalid refresh token".into()))
        })?;

    // A cryptographically valid token that was individually revoked is no
    // longer in the user's stored set.
    let live = RefreshTokenRepo::contains(&state.pool, user.id, &hash_token(&token)).await?;
    if !live {
        return Err(AppError::Core(CoreError::InvalidRefreshToken(
            "Invalid refresh token".into(),
        )));
    }

    let access_token = state.tokens.mint_access(user.id, &user.email)?;
    Ok(Json(RefreshResponse { access_token }))
}

/// POST /api/v1/auth/logout
///
/// Revoke the presented refresh token (if any) and blacklist the access
/// token used for this call.
pub async fn logout(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RefreshTokenBody>,
) -> AppResult<Json<MessageResponse>> {
    if let Some(refresh_token) = input.refresh_token.filter(|t| !t.is_empty()) {
        RefreshTokenRepo::remove(&state.pool, auth.user_id, &hash_token(&refresh_token)).await?;
    }

    state.tokens.revoke_access(&auth.token).await;

    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}

/// POST /api/v1/auth/logout-all
///
/// Clear every refresh token for the user and blacklist the current
/// access token.
pub async fn logout_all(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<MessageResponse>> {
    RefreshTokenRepo::remove_all_for_user(&state.pool, auth.user_id).await?;
    state.tokens.revoke_access(&auth.token).await;

    Ok(Json(MessageResponse {
        message: "Logged out from all devices",
    }))
}

/// GET /api/v1/auth/me
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<UserProfile>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(user.profile()))
}

/// PUT /api/v1/auth/profile
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<UserProfile>> {
    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(user.profile()))
}

/// PUT /api/v1/auth/change-password
///
/// Verify the current password, store the new hash, and clear every
/// refresh token for defense in depth -- all other sessions must log in
/// again.
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let password_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    validate_password_strength(&input.new_password)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;
    RefreshTokenRepo::remove_all_for_user(&state.pool, user.id).await?;

    Ok(Json(MessageResponse {
        message: "Password changed successfully. Please login again.",
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mint a token pair, persist the refresh digest onto the user's queue,
/// record the login, and build the response.
async fn create_auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let pair = state.tokens.issue(user.id, &user.email)?;

    RefreshTokenRepo::push(&state.pool, user.id, &hash_token(&pair.refresh_token)).await?;
    UserRepo::record_login(&state.pool, user.id).await?;

    Ok(AuthResponse {
        user: user.profile(),
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    })
}

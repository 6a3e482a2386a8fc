use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use garde::Validate;
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    error::{AppError, Result},
    models::{session::SessionRecord, user::PublicUser},
    services::auth as auth_service,
    state::AppState,
};

/// The request payload for user signup.
#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[garde(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub password: String,
}

/// The request payload for user login.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[garde(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub password: String,
}

fn require<T: Validate<Context = ()>>(
    payload: std::result::Result<Json<T>, JsonRejection>,
    message: &str,
) -> Result<T> {
    let Json(payload) = payload.map_err(|e| {
        tracing::debug!("Rejected request body: {}", e.body_text());
        AppError::Validation(message.to_string())
    })?;
    payload
        .validate()
        .map_err(|_| AppError::Validation(message.to_string()))?;
    Ok(payload)
}

/// Handles user signup.
///
/// Signing up does not log the user in.
#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Response> {
    let payload = require(payload, "Email, name, and password are required")?;
    tracing::info!("📝 Signup attempt for: {}", payload.email);

    let user = auth_service::create_user(
        state.users.as_ref(),
        payload.email,
        payload.name,
        payload.password,
    )
    .await?;

    tracing::info!("✅ User signed up: {}", user.id);

    Ok((StatusCode::CREATED, Json(PublicUser::from(user))).into_response())
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response> {
    let payload = require(payload, "Email and password are required")?;
    tracing::info!("🔐 Login attempt for: {}", payload.email);

    let user = auth_service::authenticate_user(
        state.users.as_ref(),
        &payload.email,
        &payload.password,
    )
    .await?;

    state
        .sessions
        .create_session(&cookies, &SessionRecord::user(user.id))
        .await?;

    tracing::info!("✅ User logged in: {}", user.id);

    Ok((StatusCode::OK, Json(PublicUser::from(user))).into_response())
}

/// Handles user logout.
///
/// Always ends with a redirect home, whether or not a session existed.
/// The cookie is cleared even when the store cannot be reached; that
/// failure is only logged.
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Response {
    match state.sessions.destroy_current_session(&cookies).await {
        Ok(()) => tracing::info!("👋 Logout completed"),
        Err(e) => tracing::error!("❌ Session store failed during logout: {}", e),
    }

    Redirect::to("/").into_response()
}

/// Returns the current session, or `null`.
#[axum::debug_handler]
pub async fn current_session(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<Option<SessionRecord>>> {
    let session = state.sessions.resolve_current_session(&cookies).await?;
    Ok(Json(session))
}

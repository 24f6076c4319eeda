//! Account and session endpoints: signup, login, logout, refresh, /me

use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::{StatusCode, header::SET_COOKIE, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

use crate::AppState;
use crate::constants::MIN_PASSWORD_LEN;
use crate::domain::users;
use crate::services::error::{ApiError, is_unique_violation};
use crate::services::{cookies, password, session};

pub fn routes() -> Router<Arc<AppState>> {
    // Rate limit auth endpoints to slow down credential stuffing
    let rate_limit_config = GovernorConfigBuilder::default()
        .per_second(6)
        .burst_size(10)
        .key_extractor(SmartIpKeyExtractor)
        .finish()
        .expect("Failed to build rate limit config");

    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config.into(),
    };

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/auth/refresh", post(refresh_session))
        .route("/me", get(get_me))
        .layer(rate_limit_layer)
}

// ============================================================================
// Auth Extractor - validates the JWT cookie and carries the user id
// ============================================================================

/// Extractor that validates the access_token cookie and returns the user_id.
/// Handlers take this explicitly, so the authenticated identity is always a
/// parameter rather than ambient state.
pub struct AuthUser(pub i64);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::error!("cookie extraction error: {e:?}");
                ApiError::Internal
            })?;

        let access_token = jar
            .get(cookies::config::ACCESS_TOKEN_NAME)
            .map(|c| c.value())
            .ok_or(ApiError::Unauthorized)?;

        let user_id = session::validate_access_token(access_token, &state.jwt_secret)
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(AuthUser(user_id))
    }
}

// ============================================================================
// Signup / Login
// ============================================================================

#[derive(Deserialize)]
struct SignupRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize)]
struct MeResponse {
    id: i64,
    username: String,
}

/// Issue a fresh session for `user_id`: access token + refresh token cookies
/// appended to an existing response.
async fn attach_session_cookies(
    state: &AppState,
    user_id: i64,
    mut response: Response,
) -> Result<Response, ApiError> {
    let access_token = session::create_access_token(user_id, &state.jwt_secret)?;
    let refresh_token = session::create_refresh_token(user_id, &state.db).await?;

    response
        .headers_mut()
        .append(SET_COOKIE, cookies::build_access_cookie(&access_token)?);
    response
        .headers_mut()
        .append(SET_COOKIE, cookies::build_refresh_cookie(&refresh_token)?);

    Ok(response)
}

/// POST /signup - Create an account and log it in
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<Response, ApiError> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err(ApiError::Validation("username must not be empty".into()));
    }
    if !req.email.contains('@') {
        return Err(ApiError::Validation("email address is not valid".into()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = password::hash_password(&req.password).map_err(|e| {
        tracing::error!("password hashing failed: {e}");
        ApiError::Internal
    })?;

    let user = match users::create_user(&state.db, username, &req.email, &password_hash).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict("username is already taken".into()));
        }
        Err(e) => return Err(e.into()),
    };

    // Auto-login after signup
    let response = (
        StatusCode::CREATED,
        Json(MeResponse {
            id: user.id,
            username: user.username,
        }),
    )
        .into_response();

    attach_session_cookies(&state, user.id, response).await
}

/// POST /login - Verify credentials and start a session
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    // Unknown username and wrong password both answer 401, so login does not
    // reveal which usernames exist
    let creds = users::get_credentials_by_username(&state.db, req.username.trim())
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !password::verify_password(&req.password, &creds.password_hash) {
        return Err(ApiError::Unauthorized);
    }

    let response = Json(MeResponse {
        id: creds.id,
        username: req.username.trim().to_string(),
    })
    .into_response();

    attach_session_cookies(&state, creds.id, response).await
}

// ============================================================================
// Session endpoints
// ============================================================================

/// POST /auth/refresh - Rotate the refresh token and reissue the access token
async fn refresh_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let old_refresh_token = jar
        .get(cookies::config::REFRESH_TOKEN_NAME)
        .map(|c| c.value().to_string())
        .ok_or(ApiError::Unauthorized)?;

    // Rotation is atomic: if two requests race on the same token, one loses
    let (user_id, new_refresh_token) =
        session::rotate_refresh_token(&old_refresh_token, &state.db)
            .await
            .map_err(|_| ApiError::Unauthorized)?;

    let access_token = session::create_access_token(user_id, &state.jwt_secret)?;

    let mut response = StatusCode::NO_CONTENT.into_response();
    response
        .headers_mut()
        .append(SET_COOKIE, cookies::build_access_cookie(&access_token)?);
    response.headers_mut().append(
        SET_COOKIE,
        cookies::build_refresh_cookie(&new_refresh_token)?,
    );

    Ok(response)
}

/// POST /logout - Revoke the refresh token and clear session cookies
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(refresh_token) = jar.get(cookies::config::REFRESH_TOKEN_NAME) {
        if let Err(e) = session::revoke_refresh_token(refresh_token.value(), &state.db).await {
            // Log but don't fail logout - the cookies are cleared regardless
            tracing::warn!("failed to revoke refresh token during logout: {e}");
        }
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    response
        .headers_mut()
        .append(SET_COOKIE, cookies::build_clear_access_cookie());
    response
        .headers_mut()
        .append(SET_COOKIE, cookies::build_clear_refresh_cookie());

    response
}

/// GET /me - Current user info (validates the session)
async fn get_me(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    // A valid JWT for a deleted user is still unauthorized
    let user = users::get_user_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(MeResponse {
        id: user.id,
        username: user.username,
    }))
}

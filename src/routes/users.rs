//! User profile and follow endpoints (/users/{username}/*)

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;
use crate::domain::{connections, feed, users};
use crate::services::error::ApiError;

use super::auth::AuthUser;
use super::tweets::TweetResponse;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/{username}", get(profile))
        .route("/users/{username}/follow", post(follow_user))
        .route("/users/{username}/unfollow", post(unfollow_user))
        .route("/users/{username}/followers", get(list_followers))
        .route("/users/{username}/following", get(list_following))
}

#[derive(Serialize)]
struct ProfileResponse {
    username: String,
    follower_count: i64,
    following_count: i64,
    tweets: Vec<TweetResponse>,
}

/// GET /users/{username} - Profile feed: the user's tweets plus follow counts
async fn profile(
    State(state): State<Arc<AppState>>,
    AuthUser(_user_id): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = feed::profile_feed(&state.db, &username)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(ProfileResponse {
        username: profile.username,
        follower_count: profile.follower_count,
        following_count: profile.following_count,
        tweets: profile.tweets.into_iter().map(TweetResponse::from).collect(),
    }))
}

/// Resolve a follow/unfollow target, rejecting self-reference
async fn resolve_target(
    state: &AppState,
    requester_id: i64,
    username: &str,
) -> Result<i64, ApiError> {
    let target = users::get_user_by_username(&state.db, username)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    if target.id == requester_id {
        return Err(ApiError::SelfReference);
    }

    Ok(target.id)
}

/// POST /users/{username}/follow - Follow a user. Idempotent: 201 when the
/// edge is new, 200 when it already existed. 400 on self-follow, 404 when
/// the target does not exist.
async fn follow_user(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiError> {
    let target_id = resolve_target(&state, user_id, &username).await?;

    let created = connections::follow(&state.db, user_id, target_id).await?;

    Ok(if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    })
}

/// POST /users/{username}/unfollow - Unfollow a user. Removing an edge that
/// does not exist is a no-op success.
async fn unfollow_user(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiError> {
    let target_id = resolve_target(&state, user_id, &username).await?;

    connections::unfollow(&state.db, user_id, target_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/{username}/followers - Who follows this user, oldest follow first
async fn list_followers(
    State(state): State<Arc<AppState>>,
    AuthUser(_user_id): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<Vec<connections::ConnectionEntry>>, ApiError> {
    let user = users::get_user_by_username(&state.db, &username)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let followers = connections::list_followers(&state.db, user.id).await?;

    Ok(Json(followers))
}

/// GET /users/{username}/following - Who this user follows, oldest follow first
async fn list_following(
    State(state): State<Arc<AppState>>,
    AuthUser(_user_id): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<Vec<connections::ConnectionEntry>>, ApiError> {
    let user = users::get_user_by_username(&state.db, &username)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let following = connections::list_following(&state.db, user.id).await?;

    Ok(Json(following))
}

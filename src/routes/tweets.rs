//! Tweet endpoints: home feed, create, detail, delete, like/unlike

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::AppState;
use crate::domain::{favorites, feed, tweets, users};
use crate::services::error::ApiError;

use super::auth::AuthUser;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tweets", get(home_feed).post(create_tweet))
        .route("/tweets/{id}", get(tweet_detail).delete(delete_tweet))
        .route("/tweets/{id}/like", post(like_tweet))
        .route("/tweets/{id}/unlike", post(unlike_tweet))
}

/// Tweet API response DTO, shared with the profile endpoint
#[derive(Debug, Serialize)]
pub struct TweetResponse {
    pub id: Uuid,
    pub author: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
}

impl From<feed::FeedTweet> for TweetResponse {
    fn from(t: feed::FeedTweet) -> Self {
        Self {
            id: t.id,
            author: t.author,
            title: t.title,
            content: t.content,
            created_at: t.created_at,
            like_count: t.like_count,
        }
    }
}

/// GET /tweets - Home feed: all tweets newest first, with live like counts
async fn home_feed(
    State(state): State<Arc<AppState>>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<TweetResponse>>, ApiError> {
    let tweets = feed::home_feed(&state.db).await?;

    Ok(Json(tweets.into_iter().map(TweetResponse::from).collect()))
}

#[derive(Deserialize)]
struct CreateTweetRequest {
    title: String,
    content: String,
}

/// POST /tweets - Create a tweet authored by the current user
async fn create_tweet(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateTweetRequest>,
) -> Result<(StatusCode, Json<TweetResponse>), ApiError> {
    tweets::validate(&req.title, &req.content).map_err(ApiError::Validation)?;

    let author = users::get_user_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let tweet = tweets::create_tweet(&state.db, user_id, &req.title, &req.content).await?;

    Ok((
        StatusCode::CREATED,
        Json(TweetResponse {
            id: tweet.id,
            author: author.username,
            title: tweet.title,
            content: tweet.content,
            created_at: tweet.created_at,
            like_count: 0,
        }),
    ))
}

/// GET /tweets/{id} - Tweet detail with its current like count
async fn tweet_detail(
    State(state): State<Arc<AppState>>,
    AuthUser(_user_id): AuthUser,
    Path(tweet_id): Path<Uuid>,
) -> Result<Json<TweetResponse>, ApiError> {
    let tweet = feed::tweet_detail(&state.db, tweet_id)
        .await?
        .ok_or(ApiError::NotFound("tweet"))?;

    Ok(Json(TweetResponse::from(tweet)))
}

/// DELETE /tweets/{id} - Delete a tweet; only the author may do this.
/// Favorites on the tweet are removed in the same transaction.
async fn delete_tweet(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(tweet_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    match feed::delete_tweet(&state.db, user_id, tweet_id).await? {
        feed::DeleteTweet::Deleted => Ok(StatusCode::NO_CONTENT),
        feed::DeleteTweet::NotFound => Err(ApiError::NotFound("tweet")),
        feed::DeleteTweet::NotOwner => Err(ApiError::Forbidden),
    }
}

#[derive(Serialize)]
struct LikeResponse {
    like_count: i64,
}

/// POST /tweets/{id}/like - Like a tweet. Repeating a like is a no-op;
/// 201 on a new like, 200 when it already existed.
async fn like_tweet(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(tweet_id): Path<Uuid>,
) -> Result<(StatusCode, Json<LikeResponse>), ApiError> {
    tweets::get_tweet(&state.db, tweet_id)
        .await?
        .ok_or(ApiError::NotFound("tweet"))?;

    let created = favorites::like(&state.db, user_id, tweet_id).await?;
    let like_count = favorites::count_likes(&state.db, tweet_id).await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(LikeResponse { like_count })))
}

/// POST /tweets/{id}/unlike - Remove a like. Removing a like that does not
/// exist is a no-op success.
async fn unlike_tweet(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(tweet_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    tweets::get_tweet(&state.db, tweet_id)
        .await?
        .ok_or(ApiError::NotFound("tweet"))?;

    favorites::unlike(&state.db, user_id, tweet_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

//! Feed assembly - aggregate read models over tweets, favorites and connections

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use super::{connections, users};

/// A tweet annotated with its author and its like count at read time
#[derive(Debug, sqlx::FromRow)]
pub struct FeedTweet {
    pub id: Uuid,
    pub author: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
}

/// A user's profile page: their tweets plus follow counts
#[derive(Debug)]
pub struct ProfileFeed {
    pub username: String,
    pub follower_count: i64,
    pub following_count: i64,
    pub tweets: Vec<FeedTweet>,
}

/// Outcome of an owner-checked tweet deletion
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteTweet {
    Deleted,
    NotFound,
    NotOwner,
}

/// Home feed: every tweet, newest first (creation time, id as a tiebreaker
/// so the order is deterministic). Like counts are computed by the join at
/// read time, never cached.
pub async fn home_feed<'e, E>(executor: E) -> Result<Vec<FeedTweet>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT t.id, u.username AS author, t.title, t.content, t.created_at,
               COUNT(f.id) AS like_count
        FROM tweets t
        JOIN users u ON u.id = t.user_id
        LEFT JOIN favorites f ON f.tweet_id = t.id
        GROUP BY t.id, u.id
        ORDER BY t.created_at DESC, t.id
        "#,
    )
    .fetch_all(executor)
    .await
}

/// Single tweet with its current like count
pub async fn tweet_detail<'e, E>(
    executor: E,
    tweet_id: Uuid,
) -> Result<Option<FeedTweet>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT t.id, u.username AS author, t.title, t.content, t.created_at,
               COUNT(f.id) AS like_count
        FROM tweets t
        JOIN users u ON u.id = t.user_id
        LEFT JOIN favorites f ON f.tweet_id = t.id
        WHERE t.id = $1
        GROUP BY t.id, u.id
        "#,
    )
    .bind(tweet_id)
    .fetch_optional(executor)
    .await
}

/// Profile feed for a username: their tweets (newest first, with like
/// counts) plus follower/following counts. Returns None when the user does
/// not exist.
pub async fn profile_feed(db: &PgPool, username: &str) -> Result<Option<ProfileFeed>, sqlx::Error> {
    let Some(user) = users::get_user_by_username(db, username).await? else {
        return Ok(None);
    };

    let follower_count = connections::count_followers(db, user.id).await?;
    let following_count = connections::count_following(db, user.id).await?;

    let tweets = sqlx::query_as(
        r#"
        SELECT t.id, u.username AS author, t.title, t.content, t.created_at,
               COUNT(f.id) AS like_count
        FROM tweets t
        JOIN users u ON u.id = t.user_id
        LEFT JOIN favorites f ON f.tweet_id = t.id
        WHERE t.user_id = $1
        GROUP BY t.id, u.id
        ORDER BY t.created_at DESC, t.id
        "#,
    )
    .bind(user.id)
    .fetch_all(db)
    .await?;

    Ok(Some(ProfileFeed {
        username: user.username,
        follower_count,
        following_count,
        tweets,
    }))
}

/// Delete a tweet after checking ownership. Favorites are removed explicitly
/// before the tweet row, all inside one transaction, so no like edge ever
/// outlives its tweet.
pub async fn delete_tweet(
    db: &PgPool,
    requester_id: i64,
    tweet_id: Uuid,
) -> Result<DeleteTweet, sqlx::Error> {
    let mut tx = db.begin().await?;

    // Lock the row so a concurrent delete of the same tweet serializes here
    let row: Option<(i64,)> = sqlx::query_as("SELECT user_id FROM tweets WHERE id = $1 FOR UPDATE")
        .bind(tweet_id)
        .fetch_optional(&mut *tx)
        .await?;

    let Some((author_id,)) = row else {
        return Ok(DeleteTweet::NotFound);
    };
    if author_id != requester_id {
        return Ok(DeleteTweet::NotOwner);
    }

    sqlx::query("DELETE FROM favorites WHERE tweet_id = $1")
        .bind(tweet_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM tweets WHERE id = $1")
        .bind(tweet_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(DeleteTweet::Deleted)
}

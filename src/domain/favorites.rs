//! Favorite index - (user, tweet) like edges
//!
//! The `(user_id, tweet_id)` unique index makes like idempotent: repeating a
//! like never creates a second edge. Tweet existence is checked by the routes
//! before these queries run.

use sqlx::{Executor, Postgres};
use uuid::Uuid;

/// Insert a like edge. Returns true if the edge was created, false if the
/// user had already liked the tweet.
pub async fn like<'e, E>(executor: E, user_id: i64, tweet_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO favorites (user_id, tweet_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, tweet_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(tweet_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a like edge. Returns true if an edge was removed; a missing edge is
/// not an error.
pub async fn unlike<'e, E>(executor: E, user_id: i64, tweet_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM favorites
        WHERE user_id = $1 AND tweet_id = $2
        "#,
    )
    .bind(user_id)
    .bind(tweet_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_likes<'e, E>(executor: E, tweet_id: Uuid) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM favorites WHERE tweet_id = $1")
        .bind(tweet_id)
        .fetch_one(executor)
        .await?;

    Ok(row.0)
}

//! Connection graph - directed follow edges between users
//!
//! The `(follower_id, following_id)` unique index makes follow idempotent at
//! the database level: concurrent duplicate requests collapse into one row.
//! Self-reference is rejected by the routes before these queries run, and by
//! a CHECK constraint as a backstop.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Executor, Postgres};

/// One entry in a follower/following listing
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ConnectionEntry {
    pub username: String,
    pub followed_at: DateTime<Utc>,
}

/// Insert a follow edge. Returns true if the edge was created, false if it
/// already existed.
pub async fn follow<'e, E>(
    executor: E,
    follower_id: i64,
    following_id: i64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO connections (follower_id, following_id)
        VALUES ($1, $2)
        ON CONFLICT (follower_id, following_id) DO NOTHING
        "#,
    )
    .bind(follower_id)
    .bind(following_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a follow edge. Returns true if an edge was removed; a missing edge
/// is not an error.
pub async fn unfollow<'e, E>(
    executor: E,
    follower_id: i64,
    following_id: i64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM connections
        WHERE follower_id = $1 AND following_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(following_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_followers<'e, E>(executor: E, user_id: i64) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM connections WHERE following_id = $1")
        .bind(user_id)
        .fetch_one(executor)
        .await?;

    Ok(row.0)
}

pub async fn count_following<'e, E>(executor: E, user_id: i64) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM connections WHERE follower_id = $1")
        .bind(user_id)
        .fetch_one(executor)
        .await?;

    Ok(row.0)
}

/// Users following `user_id`, ordered by when they followed (oldest first)
pub async fn list_followers<'e, E>(
    executor: E,
    user_id: i64,
) -> Result<Vec<ConnectionEntry>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT u.username, c.created_at AS followed_at
        FROM connections c
        JOIN users u ON u.id = c.follower_id
        WHERE c.following_id = $1
        ORDER BY c.created_at, c.id
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Users that `user_id` follows, ordered by when the follow happened
pub async fn list_following<'e, E>(
    executor: E,
    user_id: i64,
) -> Result<Vec<ConnectionEntry>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT u.username, c.created_at AS followed_at
        FROM connections c
        JOIN users u ON u.id = c.following_id
        WHERE c.follower_id = $1
        ORDER BY c.created_at, c.id
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

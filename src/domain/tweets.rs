//! Tweet store - authored short posts

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::constants::{MAX_CONTENT_LEN, MAX_TITLE_LEN};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tweet {
    pub id: Uuid,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Check title/content against the length rules before touching the database.
/// Lengths are counted in characters, not bytes.
pub fn validate(title: &str, content: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title must not be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(format!("title must be at most {MAX_TITLE_LEN} characters"));
    }
    if content.trim().is_empty() {
        return Err("content must not be empty".to_string());
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(format!(
            "content must be at most {MAX_CONTENT_LEN} characters"
        ));
    }
    Ok(())
}

/// Insert a tweet with a fresh random id
pub async fn create_tweet<'e, E>(
    executor: E,
    user_id: i64,
    title: &str,
    content: &str,
) -> Result<Tweet, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        INSERT INTO tweets (id, user_id, title, content)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, title, content, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(title)
    .bind(content)
    .fetch_one(executor)
    .await
}

pub async fn get_tweet<'e, E>(executor: E, tweet_id: Uuid) -> Result<Option<Tweet>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as("SELECT id, user_id, title, content, created_at FROM tweets WHERE id = $1")
        .bind(tweet_id)
        .fetch_optional(executor)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_maximum_lengths() {
        let title = "t".repeat(MAX_TITLE_LEN);
        let content = "c".repeat(MAX_CONTENT_LEN);
        assert!(validate(&title, &content).is_ok());
    }

    #[test]
    fn rejects_empty_title() {
        assert!(validate("", "hello").is_err());
        assert!(validate("   ", "hello").is_err());
    }

    #[test]
    fn rejects_empty_content() {
        assert!(validate("hi", "").is_err());
    }

    #[test]
    fn rejects_overlong_fields() {
        let long_title = "t".repeat(MAX_TITLE_LEN + 1);
        assert!(validate(&long_title, "hello").is_err());

        let long_content = "c".repeat(MAX_CONTENT_LEN + 1);
        assert!(validate("hi", &long_content).is_err());
    }

    #[test]
    fn limits_count_characters_not_bytes() {
        // 50 multi-byte characters is within the title limit
        let title = "ü".repeat(MAX_TITLE_LEN);
        assert!(validate(&title, "hello").is_ok());
    }
}

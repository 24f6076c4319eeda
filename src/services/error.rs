//! Domain error type shared by all route handlers
//!
//! Every failure is scoped to one request: handlers return `ApiError` and the
//! `IntoResponse` impl translates it to a status code and a small JSON body
//! at the boundary. Database details are logged, never sent to the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Request payload failed a validation rule (400)
    Validation(String),
    /// A user tried to follow or unfollow themselves (400)
    SelfReference,
    /// Missing or invalid session (401)
    Unauthorized,
    /// Authenticated, but not the owner of the resource (403)
    Forbidden,
    /// The referenced user or tweet does not exist (404)
    NotFound(&'static str),
    /// A uniqueness constraint was violated (409)
    Conflict(String),
    /// Something went wrong talking to Postgres (500)
    Database(sqlx::Error),
    /// Any other server-side failure (500)
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::SelfReference => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message; internal failures are deliberately opaque.
    fn message(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::SelfReference => "cannot follow or unfollow yourself".to_string(),
            ApiError::Unauthorized => "authentication required".to_string(),
            ApiError::Forbidden => "you do not own this resource".to_string(),
            ApiError::NotFound(what) => format!("{what} not found"),
            ApiError::Conflict(msg) => msg.clone(),
            ApiError::Database(_) | ApiError::Internal => "internal server error".to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Database(e) => write!(f, "database error: {e}"),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Database(e) => tracing::error!("database error: {e}"),
            ApiError::Internal => tracing::error!("internal error"),
            _ => {}
        }
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

/// True when the error is a Postgres unique-constraint violation, used to
/// turn a duplicate-username insert into a 409 instead of a 500.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::SelfReference.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("tweet").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Conflict("taken".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Database(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn database_errors_are_opaque_to_clients() {
        let err = ApiError::Database(sqlx::Error::PoolClosed);
        assert_eq!(err.message(), "internal server error");
    }

    #[test]
    fn not_found_names_the_resource() {
        assert_eq!(ApiError::NotFound("user").message(), "user not found");
    }
}

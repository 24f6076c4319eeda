//! Cookie building utilities for session management
//!
//! Centralizes cookie formatting so login, signup, refresh and logout all
//! emit the same attributes.

use axum::http::HeaderValue;

use super::error::ApiError;

/// Cookie configuration constants
pub mod config {
    /// Access token cookie name
    pub const ACCESS_TOKEN_NAME: &str = "access_token";
    /// Refresh token cookie name
    pub const REFRESH_TOKEN_NAME: &str = "refresh_token";
    /// Access token max-age in seconds (10 minutes)
    pub const ACCESS_TOKEN_MAX_AGE_SECS: u32 = 600;
    /// Refresh token max-age in seconds (30 days)
    pub const REFRESH_TOKEN_MAX_AGE_SECS: u32 = 30 * 24 * 60 * 60;
    /// Path for both cookies (all routes)
    pub const COOKIE_PATH: &str = "/";
}

fn is_dev() -> bool {
    std::env::var("ENV").as_deref() != Ok("prod")
}

fn cookie_same_site() -> &'static str {
    match std::env::var("COOKIE_SAMESITE")
        .unwrap_or_else(|_| "Lax".to_string())
        .to_lowercase()
        .as_str()
    {
        "none" => "None",
        "strict" => "Strict",
        _ => "Lax",
    }
}

fn build_session_cookie(name: &str, token: &str, max_age: u32) -> Result<HeaderValue, ApiError> {
    let same_site = cookie_same_site();
    let secure = if is_dev() { "" } else { " Secure;" };
    let cookie = format!(
        "{}={}; HttpOnly;{} SameSite={}; Path={}; Max-Age={}",
        name,
        token,
        secure,
        same_site,
        config::COOKIE_PATH,
        max_age
    );
    cookie.parse().map_err(|_| {
        tracing::error!("failed to parse {name} cookie header");
        ApiError::Internal
    })
}

/// Build an access token Set-Cookie header value
pub fn build_access_cookie(token: &str) -> Result<HeaderValue, ApiError> {
    build_session_cookie(
        config::ACCESS_TOKEN_NAME,
        token,
        config::ACCESS_TOKEN_MAX_AGE_SECS,
    )
}

/// Build a refresh token Set-Cookie header value
pub fn build_refresh_cookie(token: &str) -> Result<HeaderValue, ApiError> {
    build_session_cookie(
        config::REFRESH_TOKEN_NAME,
        token,
        config::REFRESH_TOKEN_MAX_AGE_SECS,
    )
}

/// Build a Set-Cookie header to clear the access token
pub fn build_clear_access_cookie() -> HeaderValue {
    format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Path={}; Max-Age=0",
        config::ACCESS_TOKEN_NAME,
        config::COOKIE_PATH
    )
    .parse()
    .expect("static cookie string should always parse")
}

/// Build a Set-Cookie header to clear the refresh token
pub fn build_clear_refresh_cookie() -> HeaderValue {
    format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Path={}; Max-Age=0",
        config::REFRESH_TOKEN_NAME,
        config::COOKIE_PATH
    )
    .parse()
    .expect("static cookie string should always parse")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_cookie_has_expected_attributes() {
        let header = build_access_cookie("tok123").expect("build cookie");
        let value = header.to_str().expect("ascii header");
        assert!(value.starts_with("access_token=tok123;"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("Max-Age=600"));
        assert!(value.contains("Path=/"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let value = build_clear_refresh_cookie();
        let value = value.to_str().expect("ascii header");
        assert!(value.starts_with("refresh_token=;"));
        assert!(value.contains("Max-Age=0"));
    }
}

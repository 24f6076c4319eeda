//! Application constants

/// Maximum tweet title length in characters
pub const MAX_TITLE_LEN: usize = 50;

/// Maximum tweet content length in characters
pub const MAX_CONTENT_LEN: usize = 200;

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LEN: usize = 8;

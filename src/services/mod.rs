pub mod cookies;
pub mod error;
pub mod password;
pub mod session;

//! Domain layer - DB queries per entity
//!
//! Functions here take a sqlx executor (pool or open transaction) and return
//! `Result<_, sqlx::Error>`; translation to HTTP errors happens in the routes.

pub mod connections;
pub mod favorites;
pub mod feed;
pub mod tweets;
pub mod users;

//! Repository layer for database persistence.
//!
//! All database access uses Diesel ORM with compile-time query checking
//! against SQLite.

pub mod activity;
pub mod auth;
pub mod context;
pub mod document;
pub mod models;
pub mod pool;
pub mod profile;
pub mod util;

pub use activity::ActivityRepository;
pub use auth::AuthRepository;
pub use context::DbContext;
pub use document::DocumentRepository;
pub use pool::{DbError, DbPool};
pub use profile::ProfileRepository;
pub use util::parse_datetime;

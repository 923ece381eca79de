//! # nimbus-entity
//!
//! Domain entity models for Nimbus: users, file metadata, shares, and
//! share access log entries. Entities map 1:1 to database rows via
//! `sqlx::FromRow` and are serialized at the API boundary via serde.

pub mod file;
pub mod share;
pub mod user;

pub use file::FileMeta;
pub use share::{Share, SharePermission};
pub use user::User;

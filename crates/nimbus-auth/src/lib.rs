//! # nimbus-auth
//!
//! Credential handling for Nimbus: Argon2id password hashing and
//! verification, password policy enforcement, and JWT access tokens.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};

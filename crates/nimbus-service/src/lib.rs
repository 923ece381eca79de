//! # nimbus-service
//!
//! Business logic service layer for Nimbus. Each service orchestrates
//! repositories, blob storage, and authentication to implement
//! application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod auth;
pub mod context;
pub mod file;
pub mod share;

pub use auth::{AuthService, AuthTokens, LoginInput, RegisterInput};
pub use context::RequestContext;
pub use file::{FileDownload, FileService, UploadInput};
pub use share::{
    AccessDenial, AccessLogger, CreateShareInput, ShareAccessService, ShareActor, ShareEvaluator,
    ShareGrant, ShareService, TokenGenerator,
};

//! Share management: create, evaluate, audit, and revoke shared files.

pub mod access;
pub mod audit;
pub mod evaluate;
pub mod service;
pub mod store;
#[cfg(test)]
pub(crate) mod testing;
pub mod token;

pub use access::{ShareAccessService, ShareActor};
pub use audit::AccessLogger;
pub use evaluate::{AccessDenial, ShareEvaluator, ShareGrant};
pub use service::{CreateShareInput, ShareService};
pub use store::{AccessLogStore, FileLookup, ShareStore};
pub use token::TokenGenerator;

//! Share entities: grants, the permission hierarchy, and the access log.

pub mod access_log;
pub mod model;
pub mod permission;

pub use access_log::{CreateShareAccessLog, ShareAccessLog};
pub use model::{CreateShare, Share};
pub use permission::SharePermission;

//! File metadata entity.

pub mod model;

pub use model::{CreateFileMeta, FileMeta};

//! # nimbus-storage
//!
//! Local filesystem blob storage. A deliberately thin wrapper: file access
//! control lives entirely in the service layer, this crate only moves bytes.

pub mod local;

pub use local::{BlobStore, ByteStream};

//! File upload, download, and deletion.

pub mod service;

pub use service::{FileDownload, FileService, UploadInput};

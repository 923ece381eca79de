//! File storage configuration.

use serde::{Deserialize, Serialize};

/// Local blob storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory where uploaded file bytes are stored.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

fn default_root_path() -> String {
    "data/blobs".to_string()
}

fn default_max_upload() -> u64 {
    // 100 MiB
    100 * 1024 * 1024
}

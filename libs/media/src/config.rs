//! Upload configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Default size ceiling for a single uploaded image (5 MiB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Where uploads are staged and published
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Public directory the derived variants are written to
    pub upload_dir: PathBuf,
    /// Staging directory for raw uploads
    pub temp_dir: PathBuf,
    /// URL prefix the upload directory is served under
    pub public_prefix: String,
    /// Maximum accepted size of one file in bytes
    pub max_file_size: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("public/uploads"),
            temp_dir: std::env::temp_dir().join("storefront-uploads"),
            public_prefix: "/uploads".to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

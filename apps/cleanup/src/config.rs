// [apps/cleanup/src/config.rs]
//! Cleanup task configuration surface: the same storage/database knobs as
//! the worker pool, plus the sweep interval.

use clap::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendTag {
    Local,
    S3,
    Minio,
}

impl StorageBackendTag {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Some(StorageBackendTag::Local),
            "s3" => Some(StorageBackendTag::S3),
            "minio" => Some(StorageBackendTag::Minio),
            _ => None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "geoconvert-cleanup",
    about = "Hourly sweep that deletes expired artifacts and marks their jobs expired."
)]
pub struct CleanupDirectives {
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[arg(long, env = "DATABASE_AUTH_TOKEN")]
    pub database_auth_token: Option<String>,

    #[arg(long, env = "STORAGE_BACKEND", default_value = "local")]
    pub storage_backend: String,

    #[arg(long, env = "STORAGE_ROOT", default_value = "./var/storage")]
    pub storage_root: String,

    #[arg(long, env = "STORAGE_RETRIEVAL_BASE_URL", default_value = "http://localhost:8080/v1/artifacts")]
    pub storage_retrieval_base_url: String,

    #[arg(long, env = "STORAGE_BUCKET")]
    pub storage_bucket: Option<String>,

    #[arg(long, env = "CLEANUP_SWEEP_INTERVAL_SECONDS", default_value_t = 3600)]
    pub sweep_interval_seconds: u64,
}

impl CleanupDirectives {
    pub fn storage_backend_tag(&self) -> Option<StorageBackendTag> {
        StorageBackendTag::parse(&self.storage_backend)
    }
}

// [apps/worker/src/config.rs]
//! Worker pool configuration surface (§4.8's "Configuration surface"),
//! environment-driven with CLI override for local runs.

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
    name = "geoconvert-worker",
    about = "Conversion worker: pulls dispatched jobs and runs the orchestrator."
)]
pub struct WorkerDirectives {
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[arg(long, env = "DATABASE_AUTH_TOKEN")]
    pub database_auth_token: Option<String>,

    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    /// One of `local`, `s3`, `minio`. `minio` reuses the S3-compatible
    /// backend; point it at a non-AWS endpoint via the usual AWS SDK
    /// environment variables (`AWS_ENDPOINT_URL`).
    #[arg(long, env = "STORAGE_BACKEND", default_value = "local")]
    pub storage_backend: String,

    #[arg(long, env = "STORAGE_ROOT", default_value = "./var/storage")]
    pub storage_root: String,

    #[arg(long, env = "STORAGE_RETRIEVAL_BASE_URL", default_value = "http://localhost:8080/v1/artifacts")]
    pub storage_retrieval_base_url: String,

    #[arg(long, env = "STORAGE_BUCKET")]
    pub storage_bucket: Option<String>,

    #[arg(long, env = "WORKER_ID", default_value = "worker-1")]
    pub worker_id: String,

    /// Soft time limit per conversion attempt (§4.8); exceeding it yields `Timeout`.
    #[arg(long, env = "CONVERSION_TIMEOUT_SECONDS", default_value_t = 600)]
    pub conversion_timeout_seconds: u64,

    /// `BRPOPLPUSH` blocking window per poll; bounds how quickly the
    /// worker notices a shutdown signal between jobs.
    #[arg(long, env = "WORKER_PULL_TIMEOUT_SECONDS", default_value_t = 5)]
    pub pull_timeout_seconds: u64,
}

impl WorkerDirectives {
    pub fn storage_backend_tag(&self) -> Option<StorageBackendTag> {
        StorageBackendTag::parse(&self.storage_backend)
    }
}

// [apps/cleanup/src/main.rs]
//! Cleanup task entry point: bootstrap the adapters, then run the sweep
//! on a fixed hourly (configurable) interval until the process exits.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use chrono::Utc;
use tracing::{error, info};

use geoconvert_cleanup_lib::{run_once, CleanupDirectives, StorageBackendTag};
use geoconvert_infra_db::repositories::JobRepository;
use geoconvert_infra_db::DbClient;
use geoconvert_infra_storage::{LocalStorage, S3Storage, StorageBackend};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    geoconvert_shared_telemetry::init_tracing("geoconvert_cleanup");

    let directives = CleanupDirectives::parse();
    info!(
        interval_seconds = directives.sweep_interval_seconds,
        "cleanup task bootstrap starting"
    );

    let db = DbClient::connect(&directives.database_url, directives.database_auth_token.clone())
        .await
        .context("failed to connect to the conversion ledger")?;

    let storage: Arc<dyn StorageBackend> = match directives.storage_backend_tag() {
        Some(StorageBackendTag::Local) => Arc::new(LocalStorage::new(
            directives.storage_root.clone(),
            directives.storage_retrieval_base_url.clone(),
        )),
        Some(StorageBackendTag::S3) | Some(StorageBackendTag::Minio) => {
            let bucket = directives
                .storage_bucket
                .clone()
                .context("STORAGE_BUCKET is required for the s3/minio backend")?;
            Arc::new(S3Storage::from_env(bucket).await)
        }
        None => anyhow::bail!("unknown STORAGE_BACKEND {:?}", directives.storage_backend),
    };

    let mut interval = tokio::time::interval(Duration::from_secs(directives.sweep_interval_seconds));
    loop {
        interval.tick().await;
        let jobs = JobRepository::new(db.connection().context("failed to open a ledger connection")?);
        if let Err(error) = run_once(&jobs, &storage, Utc::now()).await {
            error!(%error, "cleanup sweep aborted");
        }
    }
}

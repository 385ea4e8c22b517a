// [apps/worker/src/main.rs]
//! Worker pool entry point: bootstrap the adapters, then hand control to
//! `WorkerEngine::run` until a shutdown signal arrives.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use geoconvert_infra_db::DbClient;
use geoconvert_infra_queue::DispatchQueue;
use geoconvert_infra_storage::{LocalStorage, S3Storage, StorageBackend};
use geoconvert_worker_lib::{StorageBackendTag, WorkerDirectives, WorkerEngine};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    geoconvert_shared_telemetry::init_tracing("geoconvert_worker");

    let directives = WorkerDirectives::parse();
    info!(worker_id = %directives.worker_id, "worker bootstrap starting");

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

    let queue = DispatchQueue::connect(&directives.redis_url)
        .await
        .context("failed to connect to the dispatch queue")?;

    let engine = WorkerEngine::new(
        db,
        storage,
        queue,
        directives.worker_id.clone(),
        Duration::from_secs(directives.conversion_timeout_seconds),
        directives.pull_timeout_seconds,
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_for_signal = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("shutdown requested, draining current job before exit");
            shutdown_for_signal.store(true, Ordering::SeqCst);
        }
    });

    engine.run(shutdown).await;

    info!("worker pool offline");
    Ok(())
}

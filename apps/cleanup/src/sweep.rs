// [apps/cleanup/src/sweep.rs]
//! One cleanup pass (§4.8 "Cleanup task"): find every successful job past
//! its download expiry, delete the artifact, then transition to `expired`.
//! Per-job failures are swallowed so a single bad row can't block the
//! rest of the sweep; they are simply retried on the next hourly run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use geoconvert_infra_db::repositories::JobRepository;
use geoconvert_infra_storage::StorageBackend;

pub struct SweepReport {
    pub expired: u64,
    pub failed: u64,
}

pub async fn run_once(
    jobs: &JobRepository,
    storage: &Arc<dyn StorageBackend>,
    now: DateTime<Utc>,
) -> anyhow::Result<SweepReport> {
    let candidates = jobs.find_expired_successful(now).await?;
    info!(count = candidates.len(), "cleanup sweep starting");

    let mut expired = 0u64;
    let mut failed = 0u64;

    for (job_id, output_storage_path) in candidates {
        match expire_one(jobs, storage, job_id, &output_storage_path).await {
            Ok(()) => expired += 1,
            Err(error) => {
                warn!(%job_id, %error, "failed to expire job, will retry next sweep");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        error!(failed, "cleanup sweep finished with failures");
    } else {
        info!(expired, "cleanup sweep finished");
    }

    Ok(SweepReport { expired, failed })
}

async fn expire_one(
    jobs: &JobRepository,
    storage: &Arc<dyn StorageBackend>,
    job_id: uuid::Uuid,
    output_storage_path: &str,
) -> anyhow::Result<()> {
    storage.delete(output_storage_path).await?;
    jobs.mark_expired(job_id).await?;
    Ok(())
}

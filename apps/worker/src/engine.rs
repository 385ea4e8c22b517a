// [apps/worker/src/engine.rs]
//! The worker pool's per-process pull-dispatch loop (§4.8 "Worker contract").
//! Each worker pulls at most one job at a time, runs the orchestrator, and
//! writes the completion transaction before acknowledging the message.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use geoconvert_domain_jobs::artifact_expiry;
use geoconvert_domain_models::job::ConversionJob;
use geoconvert_domain_pipeline::{process, ProcessParams};
use geoconvert_infra_db::repositories::JobRepository;
use geoconvert_infra_db::DbClient;
use geoconvert_infra_queue::DispatchQueue;
use geoconvert_infra_storage::StorageBackend;

use crate::error::WorkerError;

/// Up to 2 retries on a transient upstream failure (§4.8), 3 attempts total.
const MAX_TRANSIENT_RETRIES: u32 = 2;
/// Fixed back-off between retries (§4.8).
const RETRY_BACKOFF: Duration = Duration::from_secs(10);
/// The worker process has no subprocess isolation to hard-kill a single
/// job; once the soft limit plus this grace period elapses with the
/// blocking pipeline call still running, the whole process exits so a
/// supervisor restarts it and the message is eventually reclaimed.
const HARD_TIMEOUT_GRACE: Duration = Duration::from_secs(30);

pub struct WorkerEngine {
    db: DbClient,
    storage: Arc<dyn StorageBackend>,
    queue: DispatchQueue,
    worker_id: String,
    soft_timeout: Duration,
    pull_timeout_seconds: u64,
}

impl WorkerEngine {
    pub fn new(
        db: DbClient,
        storage: Arc<dyn StorageBackend>,
        queue: DispatchQueue,
        worker_id: String,
        soft_timeout: Duration,
        pull_timeout_seconds: u64,
    ) -> Self {
        Self {
            db,
            storage,
            queue,
            worker_id,
            soft_timeout,
            pull_timeout_seconds,
        }
    }

    fn jobs(&self) -> Result<JobRepository, anyhow::Error> {
        Ok(JobRepository::new(self.db.connection()?))
    }

    #[instrument(skip(self, shutdown), fields(worker_id = %self.worker_id))]
    pub async fn run(&self, shutdown: Arc<AtomicBool>) {
        info!("worker pool loop starting");

        while !shutdown.load(Ordering::SeqCst) {
            match self.queue.pull(&self.worker_id, self.pull_timeout_seconds).await {
                Ok(Some(leased)) => {
                    let job_id = leased.message.job_id;
                    if let Err(error) = self.process_job(job_id).await {
                        error!(%job_id, %error, "job processing did not reach a terminal state");
                        continue;
                    }
                    if let Err(error) = self.queue.ack(&leased).await {
                        warn!(%job_id, %error, "failed to acknowledge processed job");
                    }
                }
                Ok(None) => continue,
                Err(error) => {
                    warn!(%error, "dispatch queue pull failed, backing off");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }

        info!("worker pool loop stopped");
    }

    /// Runs one job end to end: `pending -> processing -> {success|failed}`.
    /// Returns `Err` only when the completion transaction itself could not
    /// be written (the job is left in `processing` for a later reclaim);
    /// every other outcome is expressed as a successful terminal write.
    #[instrument(skip(self))]
    async fn process_job(&self, job_id: Uuid) -> anyhow::Result<()> {
        let jobs = self.jobs()?;
        let job = jobs.find(job_id).await?;
        let started_at = Utc::now();
        jobs.mark_processing(job_id, started_at).await?;

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.run_attempt(&job).await {
                Ok(outcome) => {
                    self.complete_success(&jobs, &job, started_at, outcome).await?;
                    return Ok(());
                }
                Err(error @ WorkerError::Timeout) => {
                    warn!(%job_id, attempt, "conversion exceeded the soft time limit");
                    let trace = format!("{error:?}");
                    self.complete_failure(&jobs, job_id, &error.to_string(), Some(&trace))
                        .await?;
                    return Ok(());
                }
                Err(error) if attempt <= MAX_TRANSIENT_RETRIES && error.is_transient() => {
                    warn!(%job_id, attempt, %error, "transient failure, retrying after back-off");
                    tokio::time::sleep(RETRY_BACKOFF).await;
                    continue;
                }
                Err(error) => {
                    let trace = format!("{error:?}");
                    self.complete_failure(&jobs, job_id, &error.to_string(), Some(&trace)).await?;
                    return Ok(());
                }
            }
        }
    }

    /// Stages the input, runs the orchestrator under the soft/hard time
    /// limit, and uploads the artifact. Publishes the three best-effort
    /// progress checkpoints (§4.8); a log failure here never fails the job.
    async fn run_attempt(&self, job: &ConversionJob) -> Result<AttemptOutcome, WorkerError> {
        let staging_dir = tempfile::tempdir().map_err(|e| WorkerError::Upstream(e.to_string()))?;

        let input_bytes = self.storage.read(&job.input_storage_path).await?;
        let staged_input_path = staging_dir.path().join("input");
        tokio::fs::write(&staged_input_path, &input_bytes)
            .await
            .map_err(|e| WorkerError::Upstream(e.to_string()))?;
        self.publish_progress(job.job_id, 10);

        self.publish_progress(job.job_id, 30);
        let conversion_result = self.run_pipeline_with_timeout(job, &staged_input_path).await?;

        self.publish_progress(job.job_id, 80);
        let output_bytes = tokio::fs::read(&conversion_result.output_path)
            .await
            .map_err(|e| WorkerError::Upstream(e.to_string()))?;
        let output_logical_name = Path::new(&job.original_filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("artifact")
            .to_string();
        let output_storage_path = self
            .storage
            .save(&output_bytes, &output_logical_name, "outputs")
            .await?;

        Ok(AttemptOutcome {
            output_storage_path,
            output_size_bytes: output_bytes.len() as u64,
            result: conversion_result,
        })
    }

    async fn run_pipeline_with_timeout(
        &self,
        job: &ConversionJob,
        staged_input_path: &Path,
    ) -> Result<geoconvert_domain_pipeline::ConversionResult, WorkerError> {
        let params = ProcessParams {
            output_format: job.params.output_format,
            target_epsg: job.params.target_epsg,
            fix_geometries: job.params.fix_geometries,
            normalize_attributes: job.params.normalize_attributes,
            encoding: job.params.encoding,
        };
        let staged_input_path = staged_input_path.to_path_buf();

        let mut handle = tokio::task::spawn_blocking(move || process(&staged_input_path, params));

        match tokio::time::timeout(self.soft_timeout, &mut handle).await {
            Ok(Ok(pipeline_result)) => Ok(pipeline_result?),
            Ok(Err(join_error)) => Err(WorkerError::Conversion(join_error.to_string())),
            Err(_elapsed) => {
                match tokio::time::timeout(HARD_TIMEOUT_GRACE, &mut handle).await {
                    Ok(_) => {}
                    Err(_) => {
                        error!(job_id = %job.job_id, "hard time limit exceeded, worker process exiting");
                        std::process::exit(1);
                    }
                }
                Err(WorkerError::Timeout)
            }
        }
    }

    /// Progress is published for observability only; there is no persisted
    /// progress field on the job record, so a log event is the entire
    /// publication and can never fail the job (§4.8).
    fn publish_progress(&self, job_id: Uuid, percent: u8) {
        info!(%job_id, percent, "conversion progress checkpoint");
    }

    async fn complete_success(
        &self,
        jobs: &JobRepository,
        job: &ConversionJob,
        started_at: chrono::DateTime<Utc>,
        outcome: AttemptOutcome,
    ) -> anyhow::Result<()> {
        let completed_at = Utc::now();
        let processing_time_seconds = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;
        let download_expires_at = artifact_expiry(completed_at);

        jobs.record_detection(
            job.job_id,
            None,
            outcome.result.source_epsg,
            Some(outcome.result.dominant_geometry),
            Some(outcome.result.input_feature_count),
        )
        .await?;

        jobs.mark_success(
            job.job_id,
            completed_at,
            &outcome.output_storage_path,
            outcome.output_size_bytes,
            outcome.result.feature_count,
            processing_time_seconds,
            &outcome.result.quality_report,
            download_expires_at,
        )
        .await?;

        info!(
            job_id = %job.job_id,
            score = outcome.result.quality_report.score,
            feature_count = outcome.result.feature_count,
            "job completed successfully"
        );
        Ok(())
    }

    async fn complete_failure(
        &self,
        jobs: &JobRepository,
        job_id: Uuid,
        message: &str,
        trace: Option<&str>,
    ) -> anyhow::Result<()> {
        jobs.mark_failed(job_id, Utc::now(), message, trace).await?;
        warn!(%job_id, message, "job failed");
        Ok(())
    }
}

struct AttemptOutcome {
    output_storage_path: String,
    output_size_bytes: u64,
    result: geoconvert_domain_pipeline::ConversionResult,
}

// [libs/domain/jobs/src/service.rs]
//! `ConversionService` (C8/C9): the one contract an external HTTP layer
//! would call. Composes the persistence, storage, and dispatch adapters;
//! owns no router, handler, or auth middleware.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use geoconvert_domain_models::job::{ConversionJob, ConversionParams, JobStatus};
use geoconvert_domain_models::magic::validate_file_magic;
use geoconvert_infra_db::repositories::{JobRepository, SubscriptionRepository, UserRepository};
use geoconvert_infra_db::DbClient;
use geoconvert_infra_queue::{DispatchMessage, DispatchQueue};
use geoconvert_infra_storage::StorageBackend;

use crate::error::JobServiceError;
use crate::estimate::estimate_wait_seconds;
use crate::filename::derive_download_filename;
use crate::validation::{validate_input_exists, validate_params, validate_size_limit};

/// Artifact download TTL handed to the storage backend (§4.9).
const DOWNLOAD_URL_TTL_SECONDS: u64 = 3600;
/// Artifact retention window after a successful conversion (§4.8 completion).
const ARTIFACT_RETENTION_HOURS: i64 = 24;

pub struct SubmitRequest {
    pub user_id: Uuid,
    pub original_filename: String,
    pub input_storage_path: String,
    pub input_size_bytes: u64,
    pub params: ConversionParams,
}

pub struct SubmitResult {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub estimated_wait_seconds: u64,
}

pub struct DownloadDescriptor {
    pub download_url: String,
    pub filename: String,
    pub expires_at: chrono::DateTime<Utc>,
    pub size_bytes: u64,
}

/// The surface an HTTP layer calls. No implementation of this trait may
/// assume a particular transport; it only ever sees domain types.
#[async_trait]
pub trait ConversionService: Send + Sync {
    async fn submit(&self, request: SubmitRequest) -> Result<SubmitResult, JobServiceError>;
    async fn status(&self, user_id: Uuid, job_id: Uuid) -> Result<ConversionJob, JobServiceError>;
    async fn list(&self, user_id: Uuid, limit: u32) -> Result<Vec<ConversionJob>, JobServiceError>;
    async fn download_url(&self, user_id: Uuid, job_id: Uuid) -> Result<DownloadDescriptor, JobServiceError>;
}

pub struct JobService {
    db: DbClient,
    storage: Arc<dyn StorageBackend>,
    queue: DispatchQueue,
}

impl JobService {
    pub fn new(db: DbClient, storage: Arc<dyn StorageBackend>, queue: DispatchQueue) -> Self {
        Self { db, storage, queue }
    }

    fn jobs(&self) -> Result<JobRepository, JobServiceError> {
        Ok(JobRepository::new(self.db.connection()?))
    }

    fn subscriptions(&self) -> Result<SubscriptionRepository, JobServiceError> {
        Ok(SubscriptionRepository::new(self.db.connection()?))
    }

    fn users(&self) -> Result<UserRepository, JobServiceError> {
        Ok(UserRepository::new(self.db.connection()?))
    }

    fn check_ownership(job: &ConversionJob, user_id: Uuid) -> Result<(), JobServiceError> {
        if job.user_id != user_id {
            return Err(JobServiceError::Forbidden);
        }
        Ok(())
    }
}

#[async_trait]
impl ConversionService for JobService {
    #[instrument(skip(self, request))]
    async fn submit(&self, request: SubmitRequest) -> Result<SubmitResult, JobServiceError> {
        validate_params(&request.params)?;
        validate_input_exists(&request.input_storage_path)?;

        let extension = Path::new(&request.original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let header = self.storage.read(&request.input_storage_path).await?;
        if !validate_file_magic(extension, &header) {
            return Err(JobServiceError::InvalidInput(format!(
                "{} does not match the file signature expected for .{extension}",
                request.original_filename
            )));
        }

        let user = self.users()?.find(request.user_id).await?;
        if !user.is_active {
            return Err(JobServiceError::Forbidden);
        }

        let subscription_repo = self.subscriptions()?;
        let mut subscription = subscription_repo.find_for_user(request.user_id).await?;

        let now = Utc::now();
        let period_was_stale = now >= subscription.current_period_end;
        subscription.roll_period_if_expired(now, now + Duration::days(30));
        if period_was_stale {
            subscription_repo.roll_period(&subscription).await?;
        }

        validate_size_limit(subscription.plan, request.input_size_bytes)?;

        if !subscription.has_quota_remaining() {
            warn!(user_id = %request.user_id, "submission refused, quota exhausted");
            return Err(JobServiceError::QuotaExhausted);
        }

        let job = ConversionJob::new(
            request.user_id,
            request.original_filename,
            request.input_storage_path,
            request.input_size_bytes,
            request.params,
            now,
        );

        let jobs = self.jobs()?;
        jobs.insert_with_quota_increment(&job, subscription.plan.monthly_conversion_limit())
            .await?;

        self.queue.enqueue(&DispatchMessage::new(job.job_id)).await?;

        let jobs_ahead = jobs.count_active().await.unwrap_or(0);
        let estimated_wait_seconds = estimate_wait_seconds(jobs_ahead);

        info!(job_id = %job.job_id, user_id = %request.user_id, "job submitted");

        Ok(SubmitResult {
            job_id: job.job_id,
            status: job.status,
            estimated_wait_seconds,
        })
    }

    async fn status(&self, user_id: Uuid, job_id: Uuid) -> Result<ConversionJob, JobServiceError> {
        let job = self.jobs()?.find(job_id).await?;
        Self::check_ownership(&job, user_id)?;
        Ok(job)
    }

    async fn list(&self, user_id: Uuid, limit: u32) -> Result<Vec<ConversionJob>, JobServiceError> {
        Ok(self.jobs()?.list_for_user(user_id, limit).await?)
    }

    #[instrument(skip(self))]
    async fn download_url(&self, user_id: Uuid, job_id: Uuid) -> Result<DownloadDescriptor, JobServiceError> {
        let job = self.jobs()?.find(job_id).await?;
        Self::check_ownership(&job, user_id)?;

        if job.status != JobStatus::Success {
            return Err(JobServiceError::NotReady);
        }

        let storage_path = job
            .outcome
            .output_storage_path
            .as_deref()
            .ok_or(JobServiceError::NotFound)?;

        let expires_at = job.outcome.download_expires_at.ok_or(JobServiceError::NotReady)?;
        if Utc::now() > expires_at {
            return Err(JobServiceError::Expired);
        }

        let download_url = self.storage.get_url(storage_path, DOWNLOAD_URL_TTL_SECONDS).await?;
        let filename = derive_download_filename(&job.original_filename, job.params.output_format);
        let size_bytes = job.outcome.output_size_bytes.unwrap_or(0);

        Ok(DownloadDescriptor {
            download_url,
            filename,
            expires_at,
            size_bytes,
        })
    }
}

/// §4.8 completion/failure timestamps are computed against this constant so
/// they can be tested without wall-clock flakiness.
pub fn artifact_expiry(completed_at: chrono::DateTime<Utc>) -> chrono::DateTime<Utc> {
    completed_at + Duration::hours(ARTIFACT_RETENTION_HOURS)
}

// [libs/domain/jobs/src/error.rs]
//! The fixed user-visible error taxonomy (§7). An HTTP layer maps each
//! variant to a status code; this crate never makes that translation.

use geoconvert_infra_db::DbError;
use geoconvert_infra_queue::QueueError;
use geoconvert_infra_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobServiceError {
    /// Unknown extension, magic-byte mismatch, empty payload, unsupported
    /// output format, or EPSG out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Monthly conversion limit already reached.
    #[error("monthly conversion quota exhausted")]
    QuotaExhausted,

    /// Upload exceeds the plan's byte budget.
    #[error("upload exceeds the plan's size limit")]
    SizeLimit,

    /// Job or artifact does not exist.
    #[error("not found")]
    NotFound,

    /// Job belongs to a different user.
    #[error("forbidden")]
    Forbidden,

    /// Status isn't `success` yet.
    #[error("job is not ready for retrieval")]
    NotReady,

    /// Artifact is past its download TTL.
    #[error("artifact has expired")]
    Expired,

    /// Storage or database round-trip failed.
    #[error("upstream dependency failed: {0}")]
    UpstreamError(String),
}

impl From<DbError> for JobServiceError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::JobNotFound => JobServiceError::NotFound,
            DbError::UserNotFound | DbError::SubscriptionNotFound => JobServiceError::NotFound,
            DbError::QuotaExhausted => JobServiceError::QuotaExhausted,
            other => JobServiceError::UpstreamError(other.to_string()),
        }
    }
}

impl From<StorageError> for JobServiceError {
    fn from(error: StorageError) -> Self {
        JobServiceError::UpstreamError(error.to_string())
    }
}

impl From<QueueError> for JobServiceError {
    fn from(error: QueueError) -> Self {
        JobServiceError::UpstreamError(error.to_string())
    }
}

// [apps/worker/src/error.rs]
//! Worker-internal failure classification (§4.8): only errors whose
//! message mentions "connection" or "timeout" are transient; a soft-limit
//! `Timeout` and any pipeline failure are always terminal.

use geoconvert_domain_pipeline::PipelineError;
use geoconvert_infra_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("soft time limit exceeded")]
    Timeout,

    #[error("upstream dependency failed: {0}")]
    Upstream(String),

    #[error("conversion failed: {0}")]
    Conversion(String),
}

impl WorkerError {
    /// Whether this attempt is worth retrying (§4.8's transient-error rule).
    /// Only upstream (storage/database) failures are checked against the
    /// keyword pattern; a soft-timeout and pipeline failures are terminal
    /// by construction regardless of their message text.
    pub fn is_transient(&self) -> bool {
        match self {
            WorkerError::Upstream(message) => {
                let lower = message.to_ascii_lowercase();
                lower.contains("connection") || lower.contains("timeout")
            }
            WorkerError::Timeout | WorkerError::Conversion(_) => false,
        }
    }
}

impl From<StorageError> for WorkerError {
    fn from(error: StorageError) -> Self {
        WorkerError::Upstream(error.to_string())
    }
}

impl From<PipelineError> for WorkerError {
    fn from(error: PipelineError) -> Self {
        WorkerError::Conversion(error.to_string())
    }
}

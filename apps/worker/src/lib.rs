// [apps/worker/src/lib.rs]
//! Worker pool library surface: configuration, failure classification, and
//! the pull-dispatch engine, exercised directly by `main.rs`.

pub mod config;
pub mod engine;
pub mod error;

pub use config::{StorageBackendTag, WorkerDirectives};
pub use engine::WorkerEngine;
pub use error::WorkerError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification_matches_connection_or_timeout_keywords() {
        assert!(WorkerError::Upstream("connection reset by peer".into()).is_transient());
        assert!(WorkerError::Upstream("operation timeout".into()).is_transient());
        assert!(!WorkerError::Upstream("disk full".into()).is_transient());
    }

    #[test]
    fn soft_timeout_and_pipeline_failures_are_never_transient() {
        assert!(!WorkerError::Timeout.is_transient());
        assert!(!WorkerError::Conversion("unsupported driver".into()).is_transient());
    }

    #[test]
    fn storage_backend_tag_parses_known_values_case_insensitively() {
        assert_eq!(StorageBackendTag::parse("LOCAL"), Some(StorageBackendTag::Local));
        assert_eq!(StorageBackendTag::parse("s3"), Some(StorageBackendTag::S3));
        assert_eq!(StorageBackendTag::parse("MinIO"), Some(StorageBackendTag::Minio));
        assert_eq!(StorageBackendTag::parse("azure"), None);
    }
}

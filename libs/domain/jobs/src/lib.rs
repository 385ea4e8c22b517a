// [libs/domain/jobs/src/lib.rs]
//! Orchestrates the submit -> dispatch -> retrieve lifecycle of a single
//! conversion job (C8/C9), wiring the persistence, storage, and queue
//! adapters behind one `ConversionService` contract.

pub mod error;
pub mod estimate;
pub mod filename;
pub mod service;
pub mod validation;

pub use error::JobServiceError;
pub use estimate::{estimate_wait_seconds, AVERAGE_JOB_DURATION_SECONDS};
pub use filename::derive_download_filename;
pub use service::{artifact_expiry, ConversionService, DownloadDescriptor, JobService, SubmitRequest, SubmitResult};
pub use validation::{validate_input_exists, validate_params, validate_size_limit};

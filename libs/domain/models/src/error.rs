// [libs/domain/models/src/error.rs]
//! The fixed user-visible error taxonomy (spec.md §7). Every layer of the
//! core maps its failures onto one of these variants; the (not-built) HTTP
//! layer maps them onto status codes.

use thiserror::Error;

/// A core-level failure, tagged with the taxonomy the client ultimately sees.
///
/// `ProcessingError` deliberately carries only a short message: the full
/// diagnostic trace is persisted on the job row (`ConversionJob::error_trace`)
/// but must never be threaded through this type, so it can never leak to a
/// caller that only has a `CoreError` in hand.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("monthly conversion quota exhausted")]
    QuotaExhausted,

    #[error("upload exceeds the plan's size limit ({limit_bytes} bytes)")]
    SizeLimit { limit_bytes: u64 },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden")]
    Forbidden,

    #[error("not ready: job status is {status}")]
    NotReady { status: String },

    #[error("artifact expired")]
    Expired,

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("upstream error: {0}")]
    UpstreamError(String),

    #[error("processing failed: {0}")]
    ProcessingError(String),
}

impl CoreError {
    /// Whether a worker may retry the operation that produced this error.
    ///
    /// Mirrors §4.8: "On transient errors (messages containing 'connection'
    /// or 'timeout') the worker retries up to 2 times."
    pub fn is_transient(&self) -> bool {
        match self {
            CoreError::UpstreamError(msg) => {
                let lower = msg.to_lowercase();
                lower.contains("connection") || lower.contains("timeout")
            }
            _ => false,
        }
    }

    /// Short discriminant name, stable across releases, used for metrics and
    /// for the status-code mapping an external HTTP layer would perform.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::InvalidInput(_) => "InvalidInput",
            CoreError::QuotaExhausted => "QuotaExhausted",
            CoreError::SizeLimit { .. } => "SizeLimit",
            CoreError::NotFound(_) => "NotFound",
            CoreError::Forbidden => "Forbidden",
            CoreError::NotReady { .. } => "NotReady",
            CoreError::Expired => "Expired",
            CoreError::Timeout(_) => "Timeout",
            CoreError::UpstreamError(_) => "UpstreamError",
            CoreError::ProcessingError(_) => "ProcessingError",
        }
    }
}

// [libs/infra/db/src/errors.rs]
//! Error catalog for the persistence layer, following the teacher's
//! per-crate `thiserror` convention.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// Physical connection or handshake failure against the libSQL cluster.
    #[error("database connection failed: {0}")]
    ConnectionError(String),

    /// Missing or malformed environment configuration.
    #[error("database configuration invalid: {0}")]
    ConfigurationError(String),

    /// A query was rejected by the libSQL engine.
    #[error("query rejected: {0}")]
    QueryError(#[from] libsql::Error),

    /// A row couldn't be mapped onto a domain type.
    #[error("row mapping failed: {0}")]
    MappingError(String),

    /// The requested job does not exist.
    #[error("job not found")]
    JobNotFound,

    /// The requested user does not exist.
    #[error("user not found")]
    UserNotFound,

    /// The requested subscription does not exist.
    #[error("subscription not found")]
    SubscriptionNotFound,

    /// A requested status transition is not legal (§4.8 state machine).
    #[error("invalid job status transition")]
    InvalidTransition,

    /// The submission transaction could not be committed atomically.
    #[error("submission transaction collapsed")]
    TransactionError,

    /// The subscription's monthly conversion limit has already been reached.
    #[error("monthly conversion quota exhausted")]
    QuotaExhausted,
}

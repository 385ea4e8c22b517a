// [libs/infra/storage/src/error.rs]

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 request failed: {0}")]
    S3(String),

    #[error("storage path {0:?} does not belong to this backend")]
    WrongBackend(String),

    #[error("malformed storage path: {0:?}")]
    MalformedPath(String),
}

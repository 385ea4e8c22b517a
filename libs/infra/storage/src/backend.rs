// [libs/infra/storage/src/backend.rs]
//! The storage abstraction (C1, §4.1): a uniform save/signed-URL/delete/read
//! surface over a local filesystem or an S3-compatible object store.

use async_trait::async_trait;

use crate::error::StorageError;

/// Uniform contract both backends satisfy. `save` must be durable before
/// returning; `delete` is idempotent; no operation may leak a path across
/// backends — `WrongBackend` guards that at the `get_url`/`delete`/`read`
/// boundary.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Writes `bytes` under a fresh, collision-resistant path derived from
    /// `logical_name` within `folder`, returning the opaque storage path.
    async fn save(&self, bytes: &[u8], logical_name: &str, folder: &str) -> Result<String, StorageError>;

    /// A URL valid for `ttl_seconds`. For object storage this is a presigned
    /// GET URL; for local storage it's the artifact-retrieval endpoint path
    /// (the HTTP layer, not this crate, enforces ownership on that route).
    async fn get_url(&self, storage_path: &str, ttl_seconds: u64) -> Result<String, StorageError>;

    /// Idempotent: deleting an absent path is not an error.
    async fn delete(&self, storage_path: &str) -> Result<(), StorageError>;

    /// Reads the full blob, used by workers to stage a remote input locally.
    async fn read(&self, storage_path: &str) -> Result<Vec<u8>, StorageError>;
}

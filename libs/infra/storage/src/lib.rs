// [libs/infra/storage/src/lib.rs]
//! Storage backend (C1, §4.1): save/signed-URL/delete/read over local
//! filesystem or an S3-compatible object store.

pub mod backend;
pub mod error;
pub mod local;
pub mod s3;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use local::LocalStorage;
pub use s3::S3Storage;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_round_trip_save_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "https://api.example.test/v1/artifacts");

        let path = storage
            .save(b"hello geoconvert", "parcels.geojson", "outputs/job-1")
            .await
            .unwrap();
        assert!(path.starts_with("file://outputs/job-1/"));

        let bytes = storage.read(&path).await.unwrap();
        assert_eq!(bytes, b"hello geoconvert");

        let url = storage.get_url(&path, 3600).await.unwrap();
        assert!(url.starts_with("https://api.example.test/v1/artifacts/outputs/job-1/"));

        storage.delete(&path).await.unwrap();
        // deleting twice is not an error
        storage.delete(&path).await.unwrap();
        assert!(storage.read(&path).await.is_err());
    }

    #[tokio::test]
    async fn local_rejects_foreign_scheme_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "https://api.example.test/v1/artifacts");
        let result = storage.read("s3://other-bucket/key").await;
        assert!(matches!(result, Err(StorageError::WrongBackend(_))));
    }
}

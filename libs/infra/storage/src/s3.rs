// [libs/infra/storage/src/s3.rs]
//! S3-compatible object-store backend. Paths take the form
//! `s3://<bucket>/<key>`, with the key embedding a random 128-bit
//! identifier (§4.1) to prevent collisions and unpredictable guessing.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::info;
use uuid::Uuid;

use crate::backend::StorageBackend;
use crate::error::StorageError;

pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: Client::new(&config),
            bucket: bucket.into(),
        }
    }

    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn parse_path<'a>(&self, storage_path: &'a str) -> Result<&'a str, StorageError> {
        let without_scheme = storage_path
            .strip_prefix("s3://")
            .ok_or_else(|| StorageError::WrongBackend(storage_path.to_string()))?;
        let (bucket, key) = without_scheme
            .split_once('/')
            .ok_or_else(|| StorageError::MalformedPath(storage_path.to_string()))?;
        if bucket != self.bucket {
            return Err(StorageError::WrongBackend(storage_path.to_string()));
        }
        Ok(key)
    }
}

#[async_trait]
impl StorageBackend for S3Storage {
    async fn save(&self, bytes: &[u8], logical_name: &str, folder: &str) -> Result<String, StorageError> {
        let key = format!("{folder}/{}_{logical_name}", Uuid::new_v4());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        info!(bucket = %self.bucket, %key, bytes = bytes.len(), "wrote artifact to object storage");
        Ok(format!("s3://{}/{key}", self.bucket))
    }

    async fn get_url(&self, storage_path: &str, ttl_seconds: u64) -> Result<String, StorageError> {
        let key = self.parse_path(storage_path)?;

        let presigning_config = PresigningConfig::expires_in(Duration::from_secs(ttl_seconds))
            .map_err(|e| StorageError::S3(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    async fn delete(&self, storage_path: &str) -> Result<(), StorageError> {
        let key = self.parse_path(storage_path)?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;
        Ok(())
    }

    async fn read(&self, storage_path: &str) -> Result<Vec<u8>, StorageError> {
        let key = self.parse_path(storage_path)?;
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;
        Ok(bytes.into_bytes().to_vec())
    }
}

// [libs/infra/storage/src/local.rs]
//! Local-filesystem storage backend. Paths take the form
//! `file://<root>/<folder>/<uuid>_<logical_name>`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::StorageBackend;
use crate::error::StorageError;

const SCHEME_PREFIX: &str = "file://";

pub struct LocalStorage {
    root: PathBuf,
    /// Base URL the artifact-retrieval endpoint is mounted under, e.g.
    /// `https://api.example.com/v1/artifacts`.
    retrieval_base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, retrieval_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            retrieval_base_url: retrieval_base_url.into(),
        }
    }

    fn resolve(&self, storage_path: &str) -> Result<PathBuf, StorageError> {
        let relative = storage_path
            .strip_prefix(SCHEME_PREFIX)
            .ok_or_else(|| StorageError::WrongBackend(storage_path.to_string()))?;
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    async fn save(&self, bytes: &[u8], logical_name: &str, folder: &str) -> Result<String, StorageError> {
        let folder_path = self.root.join(folder);
        fs::create_dir_all(&folder_path).await?;

        let unique_name = format!("{}_{}", Uuid::new_v4(), logical_name);
        let full_path = folder_path.join(&unique_name);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&full_path)
            .await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        sync_parent(&full_path).await?;

        let relative = format!("{folder}/{unique_name}");
        info!(path = %relative, bytes = bytes.len(), "wrote artifact to local storage");
        Ok(format!("{SCHEME_PREFIX}{relative}"))
    }

    async fn get_url(&self, storage_path: &str, _ttl_seconds: u64) -> Result<String, StorageError> {
        let relative = storage_path
            .strip_prefix(SCHEME_PREFIX)
            .ok_or_else(|| StorageError::WrongBackend(storage_path.to_string()))?;
        Ok(format!(
            "{}/{}",
            self.retrieval_base_url.trim_end_matches('/'),
            relative
        ))
    }

    async fn delete(&self, storage_path: &str) -> Result<(), StorageError> {
        let full_path = self.resolve(storage_path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %full_path.display(), "delete target already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn read(&self, storage_path: &str) -> Result<Vec<u8>, StorageError> {
        let full_path = self.resolve(storage_path)?;
        Ok(fs::read(&full_path).await?)
    }
}

async fn sync_parent(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        let dir = fs::File::open(parent).await?;
        dir.sync_all().await?;
    }
    Ok(())
}

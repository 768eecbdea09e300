//! services/api/src/adapters/fs_blob.rs
//!
//! A filesystem implementation of the `BlobStore` port. Raw uploads are
//! written under the configured upload directory, named by document id
//! alone; user-supplied filenames never reach the filesystem.

use async_trait::async_trait;
use bytes::Bytes;
use docchat_core::ports::{BlobStore, PortError, PortResult};
use std::path::PathBuf;
use uuid::Uuid;

/// Stores raw document bytes as `<upload_dir>/<uuid>.pdf`.
pub struct FsBlobStore {
    upload_dir: PathBuf,
}

impl FsBlobStore {
    /// Creates the adapter, ensuring the upload directory exists.
    pub async fn new(upload_dir: PathBuf) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(&upload_dir).await?;
        Ok(Self { upload_dir })
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.upload_dir.join(format!("{}.pdf", id))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, id: Uuid, raw: Bytes) -> PortResult<()> {
        tokio::fs::write(self.path_for(id), &raw)
            .await
            .map_err(|e| PortError::Unexpected(format!("failed to write blob {}: {}", id, e)))
    }

    async fn get(&self, id: Uuid) -> PortResult<Bytes> {
        match tokio::fs::read(self.path_for(id)).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PortError::NotFound(format!("blob {}", id)))
            }
            Err(e) => Err(PortError::Unexpected(format!(
                "failed to read blob {}: {}",
                id, e
            ))),
        }
    }

    async fn delete(&self, id: Uuid) -> PortResult<()> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(format!(
                "failed to delete blob {}: {}",
                id, e
            ))),
        }
    }
}

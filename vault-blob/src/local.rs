use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::{BlobConfig, BlobError, BlobName, BlobResult, BlobStore, Removal};

/// Blob store backed by a single local directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Open the store, creating the directory if it does not exist yet.
    pub async fn open(config: &BlobConfig) -> BlobResult<Self> {
        let dir = &config.dir;
        match fs::metadata(dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(BlobError::io(
                    dir,
                    std::io::Error::new(ErrorKind::AlreadyExists, "not a directory"),
                ))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::create_dir_all(dir).await.map_err(|e| BlobError::io(dir, e))?;
                info!(dir = %dir.display(), "Uploads folder created");
            }
            Err(e) => return Err(BlobError::io(dir, e)),
        }

        let root = fs::canonicalize(dir).await.map_err(|e| BlobError::io(dir, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write_new(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, original_name: &str, bytes: Bytes) -> BlobResult<BlobName> {
        let name = BlobName::generate(original_name);
        let path = self.path(&name);

        if let Err(e) = Self::write_new(&path, &bytes).await {
            if e.kind() == ErrorKind::AlreadyExists {
                return Err(BlobError::AlreadyExists {
                    name: name.to_string(),
                });
            }
            // Don't leave a truncated file behind.
            if let Err(cleanup) = fs::remove_file(&path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %cleanup, "failed to remove partial blob");
                }
            }
            return Err(BlobError::io(&path, e));
        }

        debug!(blob = %name, size = bytes.len(), "blob stored");
        Ok(name)
    }

    fn path(&self, name: &BlobName) -> PathBuf {
        self.root.join(name.as_str())
    }

    async fn delete(&self, name: &BlobName) -> BlobResult<Removal> {
        let path = self.path(name);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(blob = %name, "blob deleted");
                Ok(Removal::Removed)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(blob = %name, "blob already absent");
                Ok(Removal::AlreadyAbsent)
            }
            Err(e) => Err(BlobError::io(&path, e)),
        }
    }
}

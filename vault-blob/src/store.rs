use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{BlobName, BlobResult};

/// Core blob storage operations
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under a freshly generated name derived from `original_name`.
    async fn put(&self, original_name: &str, bytes: Bytes) -> BlobResult<BlobName>;

    /// Absolute filesystem path of a blob. Does not check existence.
    fn path(&self, name: &BlobName) -> PathBuf;

    /// Delete a blob. Deleting an absent blob is not an error.
    async fn delete(&self, name: &BlobName) -> BlobResult<Removal>;
}

/// Outcome of [`BlobStore::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    AlreadyAbsent,
}

use std::sync::Arc;

use vault_blob::{BlobConfig, BlobStore};
use vault_core::MediaStore;

use crate::multipart::UploadLimits;

/// Shared handles every handler gets through `State`. Built once at startup.
#[derive(Clone)]
pub struct VaultState {
    pub media: Arc<dyn MediaStore>,
    pub blobs: Arc<dyn BlobStore>,
    /// Directory served at the public prefix; must be the blob store's directory.
    pub uploads: BlobConfig,
    pub limits: UploadLimits,
}

impl VaultState {
    pub fn new(media: Arc<dyn MediaStore>, blobs: Arc<dyn BlobStore>, uploads: BlobConfig) -> Self {
        Self {
            media,
            blobs,
            uploads,
            limits: UploadLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: UploadLimits) -> Self {
        self.limits = limits;
        self
    }
}

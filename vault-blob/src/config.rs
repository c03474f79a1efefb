use std::path::PathBuf;

use crate::naming::BlobName;

/// Where blobs live on disk and the url prefix they are served under.
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Storage directory; created on open if missing.
    pub dir: PathBuf,

    /// Public path prefix, without trailing slash (e.g. `/uploads`).
    pub public_prefix: String,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            public_prefix: "/uploads".to_string(),
        }
    }
}

impl BlobConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Set the public prefix; a trailing slash is dropped.
    pub fn with_public_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.public_prefix = prefix.trim_end_matches('/').to_string();
        self
    }

    /// Relative url a stored blob is reachable at.
    pub fn public_url(&self, name: &BlobName) -> String {
        format!("{}/{}", self.public_prefix, name)
    }

    /// Inverse of [`public_url`](Self::public_url). `None` if the url is not ours.
    pub fn name_from_url(&self, url: &str) -> Option<BlobName> {
        let rest = url.strip_prefix(&self.public_prefix)?.strip_prefix('/')?;
        BlobName::parse(rest).ok()
    }
}

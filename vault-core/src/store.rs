use async_trait::async_trait;
use anyhow::Result;

use crate::media::{MediaId, MediaPatch, MediaRecord, NewMedia};

/// Metadata store contract for media records.
///
/// Each method is a single atomic operation on one document (or a read);
/// there are no multi-document transactions.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Insert a new record and return the identifier the store assigned.
    async fn insert(&self, media: NewMedia) -> Result<MediaId>;

    /// Records with `is_private == false`, in insertion order.
    async fn find_public(&self) -> Result<Vec<MediaRecord>>;

    /// Every record, in insertion order.
    async fn find_all(&self) -> Result<Vec<MediaRecord>>;

    async fn find_by_id(&self, id: &MediaId) -> Result<Option<MediaRecord>>;

    /// Merge the present fields of `patch`. Returns the number of matched records.
    async fn update_partial(&self, id: &MediaId, patch: &MediaPatch) -> Result<u64>;

    /// Returns the number of deleted records.
    async fn delete_by_id(&self, id: &MediaId) -> Result<u64>;
}

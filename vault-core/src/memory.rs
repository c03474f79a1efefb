use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::media::{MediaId, MediaPatch, MediaRecord, NewMedia};
use crate::store::MediaStore;

/// Process-local media store. Records keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryMediaStore {
    records: RwLock<Vec<MediaRecord>>,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn insert(&self, media: NewMedia) -> Result<MediaId> {
        let id = MediaId::new();
        self.records.write().await.push(media.into_record(id));
        Ok(id)
    }

    async fn find_public(&self) -> Result<Vec<MediaRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| !r.is_private).cloned().collect())
    }

    async fn find_all(&self) -> Result<Vec<MediaRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_id(&self, id: &MediaId) -> Result<Option<MediaRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| &r.id == id).cloned())
    }

    async fn update_partial(&self, id: &MediaId, patch: &MediaPatch) -> Result<u64> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| &r.id == id) {
            Some(record) => {
                patch.apply(record);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: &MediaId) -> Result<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| &r.id != id);
        Ok((before - records.len()) as u64)
    }
}

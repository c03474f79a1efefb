mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use vault_axum::{vault, UploadLimits, VaultApp, VaultState};
use vault_blob::{BlobConfig, LocalBlobStore};
use vault_core::{MediaStore, MemoryMediaStore};
use vault_sqlite::SqliteMediaStore;

pub use config::{defaults, Settings, MEMORY_DATABASE};

/// Open the stores named by `settings` and wire them into the HTTP app.
pub async fn build(settings: &Settings) -> Result<VaultApp> {
    let blobs = LocalBlobStore::open(&BlobConfig::new(&settings.upload_dir))
        .await
        .with_context(|| format!("opening upload dir {}", settings.upload_dir.display()))?;
    // Serve from the canonical root the store writes to.
    let uploads = BlobConfig::new(blobs.root());

    let media: Arc<dyn MediaStore> = if settings.uses_memory_store() {
        tracing::warn!("using in-memory metadata store, records are lost on restart");
        Arc::new(MemoryMediaStore::new())
    } else {
        let store = SqliteMediaStore::connect(&settings.database_url)
            .await
            .with_context(|| format!("connecting to {}", settings.database_url))?;
        tracing::info!(url = %settings.database_url, "Connected to database");
        Arc::new(store)
    };

    let state = VaultState::new(media, Arc::new(blobs), uploads)
        .with_limits(UploadLimits::for_file_size(settings.max_file_bytes));

    Ok(vault(state))
}

use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;
use vault_core::{MediaId, MediaPatch, MediaRecord, MediaStore, NewMedia};

pub static MIGRATOR: LazyLock<Migrator> = LazyLock::new(|| sqlx::migrate!("./migrations"));

const DB_ACQUIRE_TIMEOUT_SECS: u64 = 5;
const DB_MAX_CONNECTIONS: u32 = 10;
const DB_BUSY_TIMEOUT_MS: u64 = 5000;

const SELECT_COLUMNS: &str = "SELECT id, title, media_type, url, is_private, created_at FROM media";

#[derive(Error, Debug)]
pub enum SqliteStoreError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),
    #[error("Invalid timestamp: {timestamp} cannot be converted to DateTime")]
    InvalidTimestamp { timestamp: i64 },
    #[error("Invalid stored id: {id}")]
    InvalidId { id: String },
}

#[derive(sqlx::FromRow)]
struct MediaRow {
    id: String,
    title: String,
    media_type: Option<String>,
    url: String,
    is_private: bool,
    created_at: i64,
}

impl TryFrom<MediaRow> for MediaRecord {
    type Error = SqliteStoreError;

    fn try_from(row: MediaRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .parse::<MediaId>()
            .map_err(|_| SqliteStoreError::InvalidId { id: row.id.clone() })?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(row.created_at).ok_or(
            SqliteStoreError::InvalidTimestamp {
                timestamp: row.created_at,
            },
        )?;
        Ok(MediaRecord {
            id,
            title: row.title,
            media_type: row.media_type,
            url: row.url,
            is_private: row.is_private,
            created_at,
        })
    }
}

/// Media metadata persisted in a SQLite database.
#[derive(Clone, Debug)]
pub struct SqliteMediaStore {
    pool: SqlitePool,
}

impl SqliteMediaStore {
    /// Connect to `url` (e.g. `sqlite://snap-vault.db` or `sqlite::memory:`),
    /// creating the database file if needed, and run pending migrations.
    pub async fn connect(url: &str) -> Result<Self, SqliteStoreError> {
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let mut options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_millis(DB_BUSY_TIMEOUT_MS));

        let mut pool_options =
            SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(DB_ACQUIRE_TIMEOUT_SECS));

        if in_memory {
            // Every connection to `:memory:` is its own database; keep exactly one alive.
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            options = options.journal_mode(SqliteJournalMode::Wal);
            pool_options = pool_options.max_connections(DB_MAX_CONNECTIONS);
        }

        tracing::debug!(url, in_memory, "connecting media store");
        let pool = pool_options.connect_with(options).await?;
        MIGRATOR.run(&pool).await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch(&self, sql: &str) -> Result<Vec<MediaRecord>, SqliteStoreError> {
        let rows: Vec<MediaRow> = sqlx::query_as(sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(MediaRecord::try_from).collect()
    }
}

#[async_trait]
impl MediaStore for SqliteMediaStore {
    async fn insert(&self, media: NewMedia) -> anyhow::Result<MediaId> {
        let id = MediaId::new();
        sqlx::query(
            "INSERT INTO media (id, title, media_type, url, is_private, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&media.title)
        .bind(&media.media_type)
        .bind(&media.url)
        .bind(media.is_private)
        .bind(media.created_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(SqliteStoreError::from)?;
        Ok(id)
    }

    async fn find_public(&self) -> anyhow::Result<Vec<MediaRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE is_private = 0 ORDER BY seq");
        Ok(self.fetch(&sql).await?)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<MediaRecord>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY seq");
        Ok(self.fetch(&sql).await?)
    }

    async fn find_by_id(&self, id: &MediaId) -> anyhow::Result<Option<MediaRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
        let row: Option<MediaRow> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(SqliteStoreError::from)?;
        Ok(row.map(MediaRecord::try_from).transpose()?)
    }

    async fn update_partial(&self, id: &MediaId, patch: &MediaPatch) -> anyhow::Result<u64> {
        // Each column is only replaced when its flag is set, so absent fields stay as they are.
        let result = sqlx::query(
            "UPDATE media SET
                title      = CASE WHEN ? THEN ? ELSE title END,
                media_type = CASE WHEN ? THEN ? ELSE media_type END,
                is_private = CASE WHEN ? THEN ? ELSE is_private END
             WHERE id = ?",
        )
        .bind(patch.title.is_some())
        .bind(patch.title.as_deref())
        .bind(patch.media_type.is_some())
        .bind(patch.media_type.clone().flatten())
        .bind(patch.is_private.is_some())
        .bind(patch.is_private.unwrap_or(false))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(SqliteStoreError::from)?;
        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: &MediaId) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM media WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(SqliteStoreError::from)?;
        Ok(result.rows_affected())
    }
}

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::{SubsecRound, Utc};
use serde::Serialize;
use tower_http::services::ServeDir;
use tracing::{info, warn};
use vault_core::{MediaId, MediaPatch, MediaRecord, NewMedia, ResultExt, VaultError};

use crate::{multipart::MediaUpload, VaultAxumError, VaultState};

pub const LIVENESS: &str = "snap-vault-server is running";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub media_id: MediaId,
    pub media: MediaRecord,
}

fn map_json_rejection(rejection: JsonRejection) -> VaultAxumError {
    VaultError::bad_request(format!(
        "Failed to parse the request body as JSON: {}",
        rejection.body_text()
    ))
    .into()
}

fn parse_id(raw: &str) -> Result<MediaId, VaultAxumError> {
    Ok(raw.parse::<MediaId>()?)
}

/// All media routes plus the static file route for stored blobs.
pub fn media_router(state: VaultState) -> Router<()> {
    let files = ServeDir::new(&state.uploads.dir);
    let prefix = state.uploads.public_prefix.clone();

    Router::new()
        .route("/", get(liveness))
        .route("/media", get(list_public_media).post(upload_media))
        .route("/media/{id}", patch(update_media).delete(delete_media))
        .route("/my-uploads", get(list_all_media))
        .nest_service(&prefix, files)
        .with_state(state)
}

pub async fn liveness() -> &'static str {
    LIVENESS
}

/// `POST /media`: store the blob, then insert its metadata.
pub async fn upload_media(
    State(state): State<VaultState>,
    upload: MediaUpload,
) -> Result<Json<UploadResponse>, VaultAxumError> {
    let Some(file) = upload.file else {
        return Err(VaultError::bad_request("No file uploaded").into());
    };

    let title = upload
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| file.original_name.clone());
    // Only the exact string "true" marks a record private.
    let is_private = upload.is_private.as_deref() == Some("true");

    let name = state
        .blobs
        .put(&file.original_name, file.bytes)
        .await
        .or_general("Failed to upload media")?;

    let media = NewMedia {
        title,
        media_type: upload.media_type,
        url: state.uploads.public_url(&name),
        is_private,
        created_at: Utc::now().trunc_subsecs(3),
    };

    let id = match state.media.insert(media.clone()).await {
        Ok(id) => id,
        Err(e) => {
            warn!(blob = %name, "metadata insert failed, blob left orphaned");
            return Err(VaultError::general_error("Failed to upload media")
                .with_source(e)
                .into());
        }
    };

    info!(%id, blob = %name, is_private, "media uploaded");
    Ok(Json(UploadResponse {
        success: true,
        media_id: id,
        media: media.into_record(id),
    }))
}

/// `GET /media`: public records only.
pub async fn list_public_media(
    State(state): State<VaultState>,
) -> Result<Json<Vec<MediaRecord>>, VaultAxumError> {
    let records = state
        .media
        .find_public()
        .await
        .or_general("Failed to fetch media")?;
    Ok(Json(records))
}

/// `GET /my-uploads`: every record, private ones included. No access control.
pub async fn list_all_media(
    State(state): State<VaultState>,
) -> Result<Json<Vec<MediaRecord>>, VaultAxumError> {
    let records = state
        .media
        .find_all()
        .await
        .or_general("Failed to fetch media")?;
    Ok(Json(records))
}

/// `PATCH /media/{id}`: merge `title`, `type` and `isPrivate` when present.
pub async fn update_media(
    State(state): State<VaultState>,
    Path(id): Path<String>,
    data: Result<Json<MediaPatch>, JsonRejection>,
) -> Result<StatusCode, VaultAxumError> {
    let id = parse_id(&id)?;
    let Json(patch) = data.map_err(map_json_rejection)?;

    let matched = state
        .media
        .update_partial(&id, &patch)
        .await
        .or_general("Failed to update media")?;
    if matched == 0 {
        return Err(VaultError::not_found("Media not found").into());
    }

    info!(%id, "media updated");
    Ok(StatusCode::OK)
}

/// `DELETE /media/{id}`: remove the record, then its blob.
///
/// The record goes first so no list ever returns a url whose file is gone.
pub async fn delete_media(
    State(state): State<VaultState>,
    Path(id): Path<String>,
) -> Result<StatusCode, VaultAxumError> {
    let id = parse_id(&id)?;

    let record = state
        .media
        .find_by_id(&id)
        .await
        .or_general("Failed to delete media")?
        .ok_or_else(|| VaultError::not_found("Media not found"))?;

    let deleted = state
        .media
        .delete_by_id(&id)
        .await
        .or_general("Failed to delete media")?;
    if deleted == 0 {
        // Lost a race with another delete.
        return Err(VaultError::not_found("Media not found").into());
    }

    match state.uploads.name_from_url(&record.url) {
        Some(name) => {
            if let Err(e) = state.blobs.delete(&name).await {
                warn!(%id, blob = %name, "record deleted but blob removal failed");
                return Err(VaultError::general_error("Failed to delete media")
                    .with_source(e.into())
                    .into());
            }
        }
        None => warn!(%id, url = %record.url, "url outside upload prefix, no blob removed"),
    }

    info!(%id, "media deleted");
    Ok(StatusCode::OK)
}

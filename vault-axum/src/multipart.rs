use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use bytes::Bytes;
use multer::{Constraints, SizeLimit};
use vault_core::VaultError;

use crate::{VaultAxumError, VaultState};

/// Name of the multipart part that carries the file.
pub const FILE_FIELD: &str = "media";

/// Size limits applied while reading an upload.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    /// Maximum size of the file part (and of any single text field).
    pub max_file_bytes: u64,
    /// Maximum size of the whole multipart body.
    pub max_total_bytes: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: 100 * 1024 * 1024,  // 100MB
            max_total_bytes: 101 * 1024 * 1024, // file + form fields
        }
    }
}

impl UploadLimits {
    /// Limits for a given file size, leaving 1MB for the other form fields.
    pub fn for_file_size(max_file_bytes: u64) -> Self {
        Self {
            max_file_bytes,
            max_total_bytes: max_file_bytes.saturating_add(1024 * 1024),
        }
    }
}

/// The uploaded file part.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// A parsed `multipart/form-data` upload.
///
/// Parsing never fails because the file is missing; the handler decides
/// that. A request that is not multipart at all yields an empty form.
#[derive(Debug, Clone, Default)]
pub struct MediaUpload {
    pub file: Option<UploadedFile>,
    pub title: Option<String>,
    pub media_type: Option<String>,
    pub is_private: Option<String>,
}

impl FromRequest<VaultState> for MediaUpload {
    type Rejection = VaultAxumError;

    async fn from_request(req: Request, state: &VaultState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        let Ok(boundary) = multer::parse_boundary(content_type) else {
            tracing::debug!(content_type, "upload without multipart body");
            return Ok(Self::default());
        };

        let constraints = Constraints::new().size_limit(
            SizeLimit::new()
                .whole_stream(state.limits.max_total_bytes)
                .per_field(state.limits.max_file_bytes),
        );
        let stream = req.into_body().into_data_stream();
        let mut multipart = multer::Multipart::with_constraints(stream, boundary, constraints);

        let mut upload = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            // An empty file input still sends a part with `filename=""`; it carries no file.
            if field.file_name() == Some("") {
                field.bytes().await.map_err(multipart_error)?;
                tracing::debug!(field = %name, "skipping file part without a filename");
                continue;
            }

            // Parts with a filename are files, everything else is a text field.
            if let Some(original_name) = field.file_name().map(str::to_string) {
                if name != FILE_FIELD || upload.file.is_some() {
                    return Err(VaultError::bad_request(format!("Unexpected field: {name}")).into());
                }
                let content_type = field.content_type().map(|m| m.to_string());
                let bytes = field.bytes().await.map_err(multipart_error)?;
                tracing::debug!(file = %original_name, size = bytes.len(), "file part received");
                upload.file = Some(UploadedFile {
                    original_name,
                    content_type,
                    bytes,
                });
                continue;
            }

            let value = field.text().await.map_err(multipart_error)?;
            match name.as_str() {
                "title" => upload.title = Some(value),
                "type" => upload.media_type = Some(value),
                "isPrivate" => upload.is_private = Some(value),
                other => tracing::debug!(field = other, "ignoring form field"),
            }
        }

        Ok(upload)
    }
}

fn multipart_error(err: multer::Error) -> VaultAxumError {
    match err {
        multer::Error::FieldSizeExceeded { .. } | multer::Error::StreamSizeExceeded { .. } => {
            VaultError::payload_too_large("File too large").into()
        }
        other => VaultError::bad_request(format!("Failed to parse multipart data: {other}")).into(),
    }
}

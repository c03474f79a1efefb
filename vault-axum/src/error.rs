use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use vault_core::VaultError;

#[derive(Debug)]
pub struct VaultAxumError(pub anyhow::Error);

impl From<anyhow::Error> for VaultAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<VaultError> for VaultAxumError {
    fn from(e: VaultError) -> Self {
        Self(e.into_anyhow())
    }
}

impl IntoResponse for VaultAxumError {
    fn into_response(self) -> Response {
        // A VaultError may sit behind anyhow contexts; anything else is a server fault.
        let safe = match VaultError::from_anyhow(&self.0) {
            Some(vault) => vault.sanitize_for_client(),
            None => VaultError::general_error("Internal server error"),
        };

        if safe.kind.is_client_error() {
            tracing::debug!(code = safe.code(), message = %safe.message, "client error");
        } else {
            tracing::error!(error = ?self.0, "{}", safe.message);
        }

        let status =
            StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, safe.message).into_response()
    }
}

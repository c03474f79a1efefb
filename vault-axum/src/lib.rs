//! vault-axum: HTTP surface for snap-vault.
//!
//! Routes:
//! - `GET /` liveness text
//! - `POST /media` multipart upload (`media` file + `title`, `type`, `isPrivate`)
//! - `GET /media` public records, `GET /my-uploads` all records
//! - `PATCH /media/{id}`, `DELETE /media/{id}`
//! - `GET /uploads/{name}` stored files

pub mod app;
pub mod multipart;
pub mod rest;
pub mod state;
mod error;
pub use error::VaultAxumError;
pub use state::VaultState;

pub use app::{vault, VaultApp};
pub use multipart::{MediaUpload, UploadLimits, UploadedFile};

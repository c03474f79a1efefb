//! # vault-blob: local-disk blob storage
//!
//! Stores uploaded file bytes under generated names in one directory and
//! maps them to the public url they are served from.
//!
//! ```text
//! ┌─────────────────┐
//! │  HTTP handlers  │  ← metadata + response shaping
//! ├─────────────────┤
//! │   BlobStore     │  ← put / path / delete
//! ├─────────────────┤
//! │ LocalBlobStore  │  ← tokio::fs
//! └─────────────────┘
//! ```
//!
//! Names are `<unix millis>-<random suffix><ext>` (see [`naming`]), so two
//! uploads of `photo.jpg` never overwrite each other, and the generator is
//! a pure function that can be tested without a disk.

mod config;
mod error;
mod local;
pub mod naming;
pub mod store;

pub use config::BlobConfig;
pub use error::{BlobError, BlobResult};
pub use local::LocalBlobStore;
pub use naming::{generated_name, BlobName};
pub use store::{BlobStore, Removal};

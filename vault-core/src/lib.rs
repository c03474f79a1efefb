//! vault-core: transport-agnostic core for snap-vault.
//!
//! Holds the media record types, the [`MediaStore`] contract with an
//! in-memory implementation, structured errors and the key/value config.

pub mod config;
pub mod errors;
pub mod media;
pub mod memory;
pub mod store;

pub use config::{VaultConfig, VaultConfigSnapshot};
pub use errors::{ErrorKind, ResultExt, VaultError, VaultResult};
pub use media::{MediaId, MediaPatch, MediaRecord, NewMedia};
pub use memory::MemoryMediaStore;
pub use store::MediaStore;

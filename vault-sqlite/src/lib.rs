//! SQLite-backed [`vault_core::MediaStore`].
//!
//! Migrations under `migrations/` are embedded at compile time and run on
//! [`SqliteMediaStore::connect`].

pub mod store;

pub use store::{SqliteMediaStore, SqliteStoreError, MIGRATOR};

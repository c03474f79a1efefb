//! Blob names: `<unix millis>-<random suffix><ext>`.

use std::fmt;

use rand::Rng;

use crate::{BlobError, BlobResult};

/// Upper bound (inclusive) of the random suffix.
pub const SUFFIX_MAX: u64 = 1_000_000_000;

/// A validated, storage-generated blob file name.
///
/// Never contains a path separator, so joining it onto the storage
/// directory cannot escape it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobName(String);

impl BlobName {
    /// Generate a fresh name for `original_name` using the wall clock and a random suffix.
    pub fn generate(original_name: &str) -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix = rand::rng().random_range(0..=SUFFIX_MAX);
        Self(generated_name(original_name, millis, suffix))
    }

    /// Accept a name coming back from a client or a stored url.
    pub fn parse(name: &str) -> BlobResult<Self> {
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']);
        if invalid {
            return Err(BlobError::invalid_name(name));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build a blob name from its parts. Pure: same inputs, same name.
pub fn generated_name(original_name: &str, millis: i64, suffix: u64) -> String {
    format!("{millis}-{suffix}{}", extension(original_name))
}

/// Extension of the last path component, dot included.
///
/// Empty when there is no dot or the only dot is leading (`.bashrc`).
pub fn extension(original_name: &str) -> &str {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    match base.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &base[idx..],
    }
}

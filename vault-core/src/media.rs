//! Media records and the shapes used to create and patch them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::VaultError;

/// Opaque identifier of a media record, generated by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(Uuid);

impl MediaId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MediaId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MediaId {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| VaultError::bad_request("Invalid media id"))
    }
}

/// A stored media record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    #[serde(rename = "_id")]
    pub id: MediaId,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub url: String,
    pub is_private: bool,
    #[serde(with = "millis_rfc3339")]
    pub created_at: DateTime<Utc>,
}

/// Everything the store needs to create a record; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedia {
    pub title: String,
    pub media_type: Option<String>,
    pub url: String,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
}

impl NewMedia {
    pub fn into_record(self, id: MediaId) -> MediaRecord {
        MediaRecord {
            id,
            title: self.title,
            media_type: self.media_type,
            url: self.url,
            is_private: self.is_private,
            created_at: self.created_at,
        }
    }
}

/// Partial update. `None` means "leave untouched"; for `type`,
/// `Some(None)` clears the value.
///
/// Keys other than `title`, `type` and `isPrivate` are ignored, so the
/// id, url and creation time can never be patched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "present")]
    pub media_type: Option<Option<String>>,
    #[serde(default)]
    pub is_private: Option<bool>,
}

impl MediaPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.media_type.is_none() && self.is_private.is_none()
    }

    /// Merge the present fields into `record`.
    pub fn apply(&self, record: &mut MediaRecord) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(media_type) = &self.media_type {
            record.media_type = media_type.clone();
        }
        if let Some(is_private) = self.is_private {
            record.is_private = is_private;
        }
    }
}

/// RFC 3339 with exactly three fractional digits and a `Z` suffix,
/// e.g. `2024-05-01T12:00:00.000Z`.
mod millis_rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// Runs only when the key is present, so an explicit `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

use serde::{Deserialize, Serialize};
use stocking_types::MediaType;

/// A binary payload plus the content type needed to rebuild it.
///
/// The store never interprets `data`; the media type travels with the
/// payload so backups can restore it without external metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAsset {
    /// Content type of `data` (may be empty for untyped payloads).
    pub media_type: MediaType,
    /// The raw bytes.
    pub data: Vec<u8>,
}

impl StoredAsset {
    pub fn new(media_type: impl Into<MediaType>, data: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            data,
        }
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A `(key, payload)` pair as enumerated by [`AssetStore::get_all`].
///
/// [`AssetStore::get_all`]: crate::AssetStore::get_all
pub type Record = (String, StoredAsset);

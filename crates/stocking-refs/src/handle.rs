//! Session-scoped handles for stored payloads.
//!
//! A handle is the Rust-side counterpart of a browser object URL: a string
//! the presentation layer can dereference for the rest of the session. It is
//! meaningless after a restart and must never be persisted.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use stocking_store::StoredAsset;
use tracing::debug;
use uuid::Uuid;

use crate::model::AssetConfig;

/// URL scheme prefix for session handles.
pub const HANDLE_PREFIX: &str = "blob:stocking/";

/// A dereferenceable, revocable handle to an in-session payload.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetHandle(String);

impl AssetHandle {
    /// Mint a fresh, unique handle.
    pub fn generate() -> Self {
        Self(format!("{HANDLE_PREFIX}{}", Uuid::now_v7()))
    }

    /// The handle as a URL string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creates and revokes handles for binary payloads.
///
/// Implementations must be thread-safe. A handle returned by `create` stays
/// dereferenceable until it is revoked or the session ends.
pub trait HandleFactory: Send + Sync {
    /// Create a handle for `asset`.
    fn create(&self, asset: &StoredAsset) -> AssetHandle;

    /// Release a handle. Returns `true` if it was live.
    fn revoke(&self, handle: &AssetHandle) -> bool;
}

/// In-process handle registry for one session.
///
/// Keeps the payload behind every live handle so it can be dereferenced
/// with [`fetch`](SessionHandles::fetch).
#[derive(Debug, Default)]
pub struct SessionHandles {
    live: RwLock<HashMap<AssetHandle, StoredAsset>>,
}

impl SessionHandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dereference a live handle.
    pub fn fetch(&self, handle: &AssetHandle) -> Option<StoredAsset> {
        self.live.read().ok()?.get(handle).cloned()
    }

    /// Number of live handles.
    pub fn live_count(&self) -> usize {
        self.live.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Revoke every live handle.
    pub fn revoke_all(&self) -> usize {
        match self.live.write() {
            Ok(mut live) => {
                let n = live.len();
                live.clear();
                n
            }
            Err(_) => 0,
        }
    }

    /// Revoke every handle `config` does not reference.
    ///
    /// Returns the number of handles revoked.
    pub fn retain(&self, config: &AssetConfig) -> usize {
        let keep: HashSet<&AssetHandle> = config.handles().collect();
        let Ok(mut live) = self.live.write() else {
            return 0;
        };
        let before = live.len();
        live.retain(|handle, _| keep.contains(handle));
        let revoked = before - live.len();
        if revoked > 0 {
            debug!(revoked, "revoked unreferenced handles");
        }
        revoked
    }
}

impl HandleFactory for SessionHandles {
    fn create(&self, asset: &StoredAsset) -> AssetHandle {
        let handle = AssetHandle::generate();
        if let Ok(mut live) = self.live.write() {
            live.insert(handle.clone(), asset.clone());
        }
        handle
    }

    fn revoke(&self, handle: &AssetHandle) -> bool {
        self.live
            .write()
            .map(|mut live| live.remove(handle).is_some())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundled::BundledAssets;
    use crate::model::{AssetRef, AssetUpdate};
    use stocking_types::PrizeId;

    fn asset(bytes: &[u8]) -> StoredAsset {
        StoredAsset::new("image/png", bytes.to_vec())
    }

    #[test]
    fn handles_are_unique_urls() {
        let a = AssetHandle::generate();
        let b = AssetHandle::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with(HANDLE_PREFIX));
    }

    #[test]
    fn create_fetch_revoke() {
        let handles = SessionHandles::new();
        let h = handles.create(&asset(b"payload"));
        assert_eq!(handles.fetch(&h).unwrap().data, b"payload");
        assert_eq!(handles.live_count(), 1);

        assert!(handles.revoke(&h));
        assert!(handles.fetch(&h).is_none());
        assert!(!handles.revoke(&h));
    }

    #[test]
    fn revoke_all_clears() {
        let handles = SessionHandles::new();
        handles.create(&asset(b"a"));
        handles.create(&asset(b"b"));
        assert_eq!(handles.revoke_all(), 2);
        assert_eq!(handles.live_count(), 0);
    }

    #[test]
    fn retain_keeps_only_referenced() {
        let handles = SessionHandles::new();
        let kept = handles.create(&asset(b"bg"));
        let orphan = handles.create(&asset(b"old bg"));

        let mut config = AssetConfig::defaults(&BundledAssets::default());
        config.merge(
            AssetUpdate::new()
                .background(AssetRef::Session(kept.clone()))
                .prize(PrizeId::new(3).unwrap(), AssetRef::Session(kept.clone())),
        );

        assert_eq!(handles.retain(&config), 1);
        assert!(handles.fetch(&kept).is_some());
        assert!(handles.fetch(&orphan).is_none());
    }
}

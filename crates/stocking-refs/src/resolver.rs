//! Builds an [`AssetConfig`] from a store enumeration.

use std::sync::Arc;

use stocking_store::{AssetStore, Record};
use stocking_types::AssetKey;
use tracing::{debug, warn};

use crate::bundled::BundledAssets;
use crate::error::ResolveResult;
use crate::handle::HandleFactory;
use crate::model::{AssetConfig, AssetRef, AssetUpdate};

/// Resolves stored records into a typed configuration.
///
/// Every slot without a stored override gets its bundled default. Stored
/// payloads get a fresh session handle each time they are resolved.
#[derive(Clone)]
pub struct Resolver {
    bundled: BundledAssets,
    handles: Arc<dyn HandleFactory>,
}

impl Resolver {
    pub fn new(bundled: BundledAssets, handles: Arc<dyn HandleFactory>) -> Self {
        Self { bundled, handles }
    }

    pub fn bundled(&self) -> &BundledAssets {
        &self.bundled
    }

    /// Partition `records` by key and apply fallbacks.
    ///
    /// Keys that are not recognized (including `gift_` keys with a
    /// non-numeric or out-of-range suffix) are ignored.
    pub fn resolve(&self, records: Vec<Record>) -> AssetConfig {
        let mut config = AssetConfig::defaults(&self.bundled);
        let mut update = AssetUpdate::new();

        for (raw, asset) in records {
            let Some(key) = AssetKey::parse(&raw) else {
                debug!(key = %raw, "ignoring unrecognized asset key");
                continue;
            };
            let reference = AssetRef::Session(self.handles.create(&asset));
            update = match key {
                AssetKey::Background => update.background(reference),
                AssetKey::Icon => update.icon(reference),
                AssetKey::Prize(id) => update.prize(id, reference),
                AssetKey::Audio(channel) => update.audio(channel, reference),
            };
        }

        config.merge(update);
        config
    }

    /// Enumerate `store` and resolve the result.
    ///
    /// Fails with `LoadFailed` only if the enumeration itself fails; an
    /// empty store resolves to all defaults.
    pub fn load(&self, store: &dyn AssetStore) -> ResolveResult<AssetConfig> {
        let records = store.get_all()?;
        debug!(count = records.len(), "resolving stored assets");
        Ok(self.resolve(records))
    }

    /// Like [`load`](Self::load), but falls back to all defaults on failure.
    pub fn load_or_default(&self, store: &dyn AssetStore) -> AssetConfig {
        match self.load(store) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "asset load failed; using bundled defaults");
                AssetConfig::defaults(&self.bundled)
            }
        }
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("bundled", &self.bundled)
            .finish_non_exhaustive()
    }
}

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use stocking_codec::ImportReport;
use stocking_refs::{
    AssetConfig, AssetModel, AssetRef, AssetUpdate, BundledAssets, HandleFactory, Resolver,
    SessionHandles,
};
use stocking_store::{AssetStore, FileAssetStore, Record, StoredAsset};
use stocking_types::{prize_id_from_filename, AssetKey, MediaType, PrizeId};
use tracing::{debug, info};

use crate::config::CalendarConfig;
use crate::error::SdkResult;

/// A file offered for a bulk prize upload.
#[derive(Clone, Debug)]
pub struct PrizeFile {
    pub name: String,
    pub media_type: MediaType,
    pub data: Vec<u8>,
}

impl PrizeFile {
    /// A file whose media type is inferred from its name.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = MediaType::from_filename(&name);
        Self {
            name,
            media_type,
            data,
        }
    }
}

/// Outcome of [`Calendar::upload_prizes`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PrizeUploadReport {
    /// Prize slots that were written, in ascending order.
    pub accepted: Vec<PrizeId>,
    /// Filenames that did not name a prize slot.
    pub ignored: Vec<String>,
}

/// High-level calendar API.
///
/// Owns the store, the session handles and the current configuration, and
/// keeps the three consistent: every write goes to the store first, then
/// the configuration is updated, then handles nothing references any more
/// are revoked.
pub struct Calendar {
    store: Arc<dyn AssetStore>,
    handles: Arc<SessionHandles>,
    resolver: Resolver,
    model: AssetModel,
}

impl Calendar {
    /// Open the file-backed calendar described by `config`.
    ///
    /// Never fails: if stored assets cannot be loaded the calendar starts
    /// with bundled defaults.
    pub fn open(config: &CalendarConfig) -> Self {
        let store = Arc::new(FileAssetStore::new(&config.data_dir));
        Self::with_store(store, config.bundled.clone())
    }

    /// Build a calendar over an existing store.
    pub fn with_store(store: Arc<dyn AssetStore>, bundled: BundledAssets) -> Self {
        let handles = Arc::new(SessionHandles::new());
        let resolver = Resolver::new(bundled, handles.clone());
        let model = AssetModel::new(resolver.load_or_default(store.as_ref()));
        Self {
            store,
            handles,
            resolver,
            model,
        }
    }

    pub fn store(&self) -> &dyn AssetStore {
        self.store.as_ref()
    }

    pub fn bundled(&self) -> &BundledAssets {
        self.resolver.bundled()
    }

    /// The current configuration.
    pub fn snapshot(&self) -> Arc<AssetConfig> {
        self.model.snapshot()
    }

    /// Dereference a session reference. Bundled references yield `None`.
    pub fn fetch(&self, reference: &AssetRef) -> Option<StoredAsset> {
        self.handles.fetch(reference.handle()?)
    }

    /// Number of session handles currently live.
    pub fn live_handles(&self) -> usize {
        self.handles.live_count()
    }

    /// Store one asset and make it current.
    pub fn upload(
        &self,
        key: AssetKey,
        media_type: impl Into<MediaType>,
        data: Vec<u8>,
    ) -> SdkResult<AssetRef> {
        let asset = StoredAsset::new(media_type, data);
        asset.media_type.validate()?;
        self.store.put(&key.to_key(), &asset)?;

        let reference = AssetRef::Session(self.handles.create(&asset));
        let replaced = self.model.update(update_for(key, reference.clone()));
        self.release(replaced);
        info!(key = %key, bytes = asset.size(), "asset uploaded");
        Ok(reference)
    }

    /// Store a set of prize images, matching each to a slot by filename.
    ///
    /// The first run of digits in each name picks the slot. Names without
    /// digits, or naming a slot outside the board, are ignored. When two
    /// files name the same slot the later one wins. All accepted files are
    /// written in one batch.
    pub fn upload_prizes(
        &self,
        files: impl IntoIterator<Item = PrizeFile>,
    ) -> SdkResult<PrizeUploadReport> {
        let mut chosen: BTreeMap<PrizeId, StoredAsset> = BTreeMap::new();
        let mut report = PrizeUploadReport::default();

        for file in files {
            match prize_id_from_filename(&file.name) {
                Some(id) => {
                    chosen.insert(id, StoredAsset::new(file.media_type, file.data));
                }
                None => {
                    debug!(file = %file.name, "filename names no prize slot");
                    report.ignored.push(file.name);
                }
            }
        }
        for asset in chosen.values() {
            asset.media_type.validate()?;
        }

        let records: Vec<Record> = chosen
            .iter()
            .map(|(id, asset)| (AssetKey::Prize(*id).to_key(), asset.clone()))
            .collect();
        self.store.put_batch(&records)?;

        let mut update = AssetUpdate::new();
        for (id, asset) in &chosen {
            update = update.prize(*id, AssetRef::Session(self.handles.create(asset)));
        }
        let replaced = self.model.update(update);
        self.release(replaced);

        report.accepted = chosen.into_keys().collect();
        info!(
            accepted = report.accepted.len(),
            ignored = report.ignored.len(),
            "prize images uploaded"
        );
        Ok(report)
    }

    /// Encode every stored asset as a portable document.
    pub fn export(&self) -> SdkResult<String> {
        Ok(stocking_codec::export_store(self.store.as_ref())?)
    }

    /// Import a portable document, then reload the configuration.
    ///
    /// Once the batch has committed the import is reported as a success;
    /// if the reload after it fails, the calendar falls back to bundled
    /// defaults.
    pub fn import(&self, text: &str) -> SdkResult<ImportReport> {
        let report = stocking_codec::import(self.store.as_ref(), text)?;
        self.install(self.resolver.load_or_default(self.store.as_ref()));
        Ok(report)
    }

    /// Delete every stored asset and return to bundled defaults.
    pub fn reset(&self) -> SdkResult<()> {
        self.store.clear_all()?;
        self.model.replace(AssetConfig::defaults(self.resolver.bundled()));
        let revoked = self.handles.revoke_all();
        info!(revoked, "calendar reset to defaults");
        Ok(())
    }

    /// Re-resolve the configuration from the store.
    pub fn reload(&self) -> SdkResult<Arc<AssetConfig>> {
        let config = self.resolver.load(self.store.as_ref())?;
        Ok(self.install(config))
    }

    /// Make `config` current and revoke handles it no longer references.
    fn install(&self, config: AssetConfig) -> Arc<AssetConfig> {
        self.model.replace(config);
        let current = self.model.snapshot();
        self.handles.retain(&current);
        current
    }

    fn release(&self, replaced: Vec<AssetRef>) {
        for handle in replaced.iter().filter_map(AssetRef::handle) {
            self.handles.revoke(handle);
        }
    }
}

impl std::fmt::Debug for Calendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calendar")
            .field("resolver", &self.resolver)
            .field("live_handles", &self.handles.live_count())
            .finish_non_exhaustive()
    }
}

fn update_for(key: AssetKey, reference: AssetRef) -> AssetUpdate {
    let update = AssetUpdate::new();
    match key {
        AssetKey::Background => update.background(reference),
        AssetKey::Icon => update.icon(reference),
        AssetKey::Prize(id) => update.prize(id, reference),
        AssetKey::Audio(channel) => update.audio(channel, reference),
    }
}

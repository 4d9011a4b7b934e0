//! The in-memory asset configuration consumed by the presentation layer.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use stocking_types::{AudioChannel, PrizeId};

use crate::bundled::BundledAssets;
use crate::handle::AssetHandle;

/// A reference the presentation layer can render from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "url", rename_all = "snake_case")]
pub enum AssetRef {
    /// A default asset shipped with the application.
    Bundled(String),
    /// A user-supplied payload held for this session.
    Session(AssetHandle),
}

impl AssetRef {
    /// The URL to load this asset from.
    pub fn url(&self) -> &str {
        match self {
            Self::Bundled(url) => url,
            Self::Session(handle) => handle.as_str(),
        }
    }

    pub fn is_bundled(&self) -> bool {
        matches!(self, Self::Bundled(_))
    }

    /// The session handle, if this is a user-supplied asset.
    pub fn handle(&self) -> Option<&AssetHandle> {
        match self {
            Self::Session(handle) => Some(handle),
            Self::Bundled(_) => None,
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

/// References for the three audio channels.
///
/// `None` means "use the bundled default"; it never means silence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioRefs {
    pub bgm: Option<AssetRef>,
    pub drum: Option<AssetRef>,
    pub tada: Option<AssetRef>,
}

impl AudioRefs {
    pub fn get(&self, channel: AudioChannel) -> Option<&AssetRef> {
        match channel {
            AudioChannel::Bgm => self.bgm.as_ref(),
            AudioChannel::Drum => self.drum.as_ref(),
            AudioChannel::Tada => self.tada.as_ref(),
        }
    }

    fn slot_mut(&mut self, channel: AudioChannel) -> &mut Option<AssetRef> {
        match channel {
            AudioChannel::Bgm => &mut self.bgm,
            AudioChannel::Drum => &mut self.drum,
            AudioChannel::Tada => &mut self.tada,
        }
    }
}

/// Every asset reference the presentation layer needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub background: AssetRef,
    pub icon: AssetRef,
    pub prizes: BTreeMap<PrizeId, AssetRef>,
    pub audio: AudioRefs,
}

impl AssetConfig {
    /// A configuration where every slot uses its bundled default.
    pub fn defaults(bundled: &BundledAssets) -> Self {
        Self {
            background: AssetRef::Bundled(bundled.background_url()),
            icon: AssetRef::Bundled(bundled.icon_url()),
            prizes: PrizeId::all()
                .map(|id| (id, AssetRef::Bundled(bundled.prize_url(id))))
                .collect(),
            audio: AudioRefs {
                bgm: Some(AssetRef::Bundled(bundled.audio_url(AudioChannel::Bgm))),
                drum: Some(AssetRef::Bundled(bundled.audio_url(AudioChannel::Drum))),
                tada: Some(AssetRef::Bundled(bundled.audio_url(AudioChannel::Tada))),
            },
        }
    }

    pub fn prize(&self, id: PrizeId) -> Option<&AssetRef> {
        self.prizes.get(&id)
    }

    /// Every session handle referenced by this configuration.
    pub fn handles(&self) -> impl Iterator<Item = &AssetHandle> {
        [&self.background, &self.icon]
            .into_iter()
            .chain(self.prizes.values())
            .chain(
                [&self.audio.bgm, &self.audio.drum, &self.audio.tada]
                    .into_iter()
                    .flatten(),
            )
            .filter_map(AssetRef::handle)
    }

    /// Apply `update` in place. Fields the update does not mention are kept.
    ///
    /// Returns the references that were replaced.
    pub fn merge(&mut self, update: AssetUpdate) -> Vec<AssetRef> {
        let mut replaced = Vec::new();
        if let Some(bg) = update.background {
            replaced.push(std::mem::replace(&mut self.background, bg));
        }
        if let Some(icon) = update.icon {
            replaced.push(std::mem::replace(&mut self.icon, icon));
        }
        for (id, reference) in update.prizes {
            replaced.extend(self.prizes.insert(id, reference));
        }
        for (channel, reference) in update.audio {
            replaced.extend(self.audio.slot_mut(channel).replace(reference));
        }
        replaced
    }
}

/// A partial change to an [`AssetConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetUpdate {
    pub background: Option<AssetRef>,
    pub icon: Option<AssetRef>,
    pub prizes: BTreeMap<PrizeId, AssetRef>,
    pub audio: BTreeMap<AudioChannel, AssetRef>,
}

impl AssetUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(mut self, reference: AssetRef) -> Self {
        self.background = Some(reference);
        self
    }

    pub fn icon(mut self, reference: AssetRef) -> Self {
        self.icon = Some(reference);
        self
    }

    pub fn prize(mut self, id: PrizeId, reference: AssetRef) -> Self {
        self.prizes.insert(id, reference);
        self
    }

    pub fn audio(mut self, channel: AudioChannel, reference: AssetRef) -> Self {
        self.audio.insert(channel, reference);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_none()
            && self.icon.is_none()
            && self.prizes.is_empty()
            && self.audio.is_empty()
    }
}

/// Holds the current configuration and hands out consistent snapshots.
///
/// Updates are applied atomically: a snapshot taken concurrently with an
/// update sees either the old or the new configuration, never a mix.
#[derive(Debug)]
pub struct AssetModel {
    current: RwLock<Arc<AssetConfig>>,
}

impl AssetModel {
    pub fn new(config: AssetConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// The current configuration.
    pub fn snapshot(&self) -> Arc<AssetConfig> {
        match self.current.read() {
            Ok(current) => Arc::clone(&current),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Merge `update` into the current configuration.
    ///
    /// This is a pure merge: no fallback resolution happens here. Returns
    /// the references that were replaced so the caller can release them.
    pub fn update(&self, update: AssetUpdate) -> Vec<AssetRef> {
        let mut current = match self.current.write() {
            Ok(current) => current,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut next = AssetConfig::clone(&current);
        let replaced = next.merge(update);
        *current = Arc::new(next);
        replaced
    }

    /// Swap in a freshly resolved configuration, returning the old one.
    pub fn replace(&self, config: AssetConfig) -> Arc<AssetConfig> {
        let mut current = match self.current.write() {
            Ok(current) => current,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *current, Arc::new(config))
    }
}

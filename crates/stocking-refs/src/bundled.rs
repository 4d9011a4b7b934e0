//! Locations of the default assets shipped with the application.

use serde::{Deserialize, Serialize};
use stocking_types::{AudioChannel, PrizeId};

/// Where the bundled default assets live.
///
/// Every location is derived deterministically from this configuration;
/// prize defaults depend only on the prize id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundledAssets {
    /// Prefix prepended to every file name.
    pub base: String,
    pub background: String,
    pub icon: String,
    /// Extension of the per-prize images, named `<id>.<ext>`.
    pub prize_extension: String,
    pub bgm: String,
    pub drum: String,
    pub tada: String,
}

impl Default for BundledAssets {
    fn default() -> Self {
        Self {
            base: "/".into(),
            background: "santa_village_background.png".into(),
            icon: "socks.png".into(),
            prize_extension: "png".into(),
            bgm: "bgm.mp3".into(),
            drum: "drum.mp3".into(),
            tada: "ding.mp3".into(),
        }
    }
}

impl BundledAssets {
    pub fn background_url(&self) -> String {
        self.join(&self.background)
    }

    pub fn icon_url(&self) -> String {
        self.join(&self.icon)
    }

    pub fn prize_url(&self, id: PrizeId) -> String {
        self.join(&format!("{id}.{}", self.prize_extension))
    }

    pub fn audio_url(&self, channel: AudioChannel) -> String {
        let file = match channel {
            AudioChannel::Bgm => &self.bgm,
            AudioChannel::Drum => &self.drum,
            AudioChannel::Tada => &self.tada,
        };
        self.join(file)
    }

    fn join(&self, file: &str) -> String {
        if self.base.is_empty() || self.base.ends_with('/') {
            format!("{}{file}", self.base)
        } else {
            format!("{}/{file}", self.base)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_locations() {
        let b = BundledAssets::default();
        assert_eq!(b.background_url(), "/santa_village_background.png");
        assert_eq!(b.icon_url(), "/socks.png");
        assert_eq!(b.prize_url(PrizeId::new(12).unwrap()), "/12.png");
        assert_eq!(b.audio_url(AudioChannel::Bgm), "/bgm.mp3");
        assert_eq!(b.audio_url(AudioChannel::Drum), "/drum.mp3");
        assert_eq!(b.audio_url(AudioChannel::Tada), "/ding.mp3");
    }

    #[test]
    fn base_without_trailing_slash() {
        let b = BundledAssets {
            base: "https://cdn.example/static".into(),
            ..Default::default()
        };
        assert_eq!(
            b.prize_url(PrizeId::new(1).unwrap()),
            "https://cdn.example/static/1.png"
        );
    }

    #[test]
    fn empty_base_is_relative() {
        let b = BundledAssets {
            base: String::new(),
            ..Default::default()
        };
        assert_eq!(b.icon_url(), "socks.png");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let b: BundledAssets = toml::from_str("base = \"/assets/\"\ntada = \"fanfare.ogg\"").unwrap();
        assert_eq!(b.audio_url(AudioChannel::Tada), "/assets/fanfare.ogg");
        assert_eq!(b.icon_url(), "/assets/socks.png");
    }
}

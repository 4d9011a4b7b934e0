use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Number of prize slots on the board.
pub const TOTAL_PRIZES: u32 = 35;

const GIFT_PREFIX: &str = "gift_";
const AUDIO_PREFIX: &str = "audio_";

/// Identifier of a prize, guaranteed to be within `1..=TOTAL_PRIZES`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PrizeId(u32);

impl PrizeId {
    /// Create a prize id, rejecting values outside `1..=TOTAL_PRIZES`.
    pub fn new(id: u32) -> Result<Self, TypeError> {
        if (1..=TOTAL_PRIZES).contains(&id) {
            Ok(Self(id))
        } else {
            Err(TypeError::PrizeOutOfRange(id))
        }
    }

    /// The numeric value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Every valid prize id in ascending order.
    pub fn all() -> impl Iterator<Item = PrizeId> {
        (1..=TOTAL_PRIZES).map(PrizeId)
    }
}

impl TryFrom<u32> for PrizeId {
    type Error = TypeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PrizeId> for u32 {
    fn from(id: PrizeId) -> Self {
        id.0
    }
}

impl fmt::Display for PrizeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named audio channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioChannel {
    /// Background music loop.
    Bgm,
    /// Suspense drumroll played before a reveal.
    Drum,
    /// Fanfare played on reveal.
    Tada,
}

impl AudioChannel {
    pub const ALL: [AudioChannel; 3] = [Self::Bgm, Self::Drum, Self::Tada];

    /// Short channel name as it appears in the key suffix.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bgm => "bgm",
            Self::Drum => "drum",
            Self::Tada => "tada",
        }
    }
}

impl fmt::Display for AudioChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AudioChannel {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bgm" => Ok(Self::Bgm),
            "drum" => Ok(Self::Drum),
            "tada" => Ok(Self::Tada),
            other => Err(TypeError::UnknownChannel(other.to_string())),
        }
    }
}

/// Parsed form of a stored asset key.
///
/// The store itself never looks inside keys. Recognized forms:
///
/// | Key | Variant |
/// |---|---|
/// | `bg` | [`AssetKey::Background`] |
/// | `sock` | [`AssetKey::Icon`] |
/// | `gift_<N>` with N in `1..=35` | [`AssetKey::Prize`] |
/// | `audio_bgm`, `audio_drum`, `audio_tada` | [`AssetKey::Audio`] |
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetKey {
    Background,
    Icon,
    Prize(PrizeId),
    Audio(AudioChannel),
}

impl AssetKey {
    /// Parse a raw store key.
    ///
    /// Returns `None` for anything that is not a recognized key form,
    /// including `gift_` keys whose suffix is non-numeric or out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use stocking_types::{AssetKey, AudioChannel};
    ///
    /// assert_eq!(AssetKey::parse("bg"), Some(AssetKey::Background));
    /// assert_eq!(AssetKey::parse("audio_tada"), Some(AssetKey::Audio(AudioChannel::Tada)));
    /// assert!(AssetKey::parse("gift_36").is_none());
    /// assert!(AssetKey::parse("gift_x").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "bg" => return Some(Self::Background),
            "sock" => return Some(Self::Icon),
            _ => {}
        }

        if let Some(suffix) = raw.strip_prefix(GIFT_PREFIX) {
            if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let id = suffix.parse::<u32>().ok()?;
            return PrizeId::new(id).ok().map(Self::Prize);
        }

        if let Some(suffix) = raw.strip_prefix(AUDIO_PREFIX) {
            return suffix.parse::<AudioChannel>().ok().map(Self::Audio);
        }

        None
    }

    /// The canonical store key for this asset.
    pub fn to_key(&self) -> String {
        match self {
            Self::Background => "bg".to_string(),
            Self::Icon => "sock".to_string(),
            Self::Prize(id) => format!("{GIFT_PREFIX}{id}"),
            Self::Audio(channel) => format!("{AUDIO_PREFIX}{channel}"),
        }
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key())
    }
}

impl FromStr for AssetKey {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TypeError::UnknownKey(s.to_string()))
    }
}

//! Foundation types for Stocking.
//!
//! Every stored asset is addressed by an [`AssetKey`]. The store treats keys
//! as opaque strings; this crate owns the semantic parsing that turns a raw
//! key back into "background", "icon", "prize N" or "audio channel X".
//!
//! # Key Types
//!
//! - [`AssetKey`] — Parsed form of a stored key (`bg`, `sock`, `gift_<N>`, `audio_*`)
//! - [`PrizeId`] — Prize slot identifier, always within `1..=TOTAL_PRIZES`
//! - [`AudioChannel`] — Named audio channels (`bgm`, `drum`, `tada`)
//! - [`MediaType`] — Content type carried alongside every payload

pub mod error;
pub mod key;
pub mod media;
pub mod names;

pub use error::TypeError;
pub use key::{AssetKey, AudioChannel, PrizeId, TOTAL_PRIZES};
pub use media::MediaType;
pub use names::prize_id_from_filename;

//! High-level SDK for Stocking.
//!
//! [`Calendar`] is the main entry point: it ties the asset store, the
//! session handles and the live configuration together, and exposes the
//! operations an application needs (uploads, backup and restore, reset).
//! [`PrizeBoard`] deals and opens the socks.

pub mod board;
pub mod calendar;
pub mod config;
pub mod error;

pub use board::{PrizeBoard, Sock};
pub use calendar::{Calendar, PrizeFile, PrizeUploadReport};
pub use config::{CalendarConfig, DEFAULT_DATA_DIR};
pub use error::{SdkError, SdkResult};

// Re-export key types
pub use stocking_codec::{ImportReport, SkippedEntry};
pub use stocking_refs::{AssetConfig, AssetRef, BundledAssets};
pub use stocking_store::{AssetStore, StoredAsset};
pub use stocking_types::{AssetKey, AudioChannel, MediaType, PrizeId, TOTAL_PRIZES};

//! Durable keyed storage for Stocking's media assets.
//!
//! The store is a flat namespace mapping string keys (`bg`, `sock`,
//! `gift_7`, `audio_bgm`, ...) to opaque binary payloads tagged with their
//! media type. It never interprets keys; that is the resolver's job.
//!
//! # Storage Backends
//!
//! All backends implement the [`AssetStore`] trait:
//!
//! - [`InMemoryAssetStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileAssetStore`] -- single-file durable store with atomic transactions
//!
//! # Design Rules
//!
//! 1. At most one record per key. A write fully replaces the prior payload.
//! 2. `put_batch` is all-or-nothing. Readers never observe a partial batch.
//! 3. The store never deletes implicitly; only `clear_all` removes records.
//! 4. Write transactions are serialized per store instance.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod record;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileAssetStore;
pub use memory::InMemoryAssetStore;
pub use record::{Record, StoredAsset};
pub use traits::AssetStore;

//! Reference resolution for Stocking.
//!
//! Turns the raw `(key, payload)` enumeration of an asset store into the
//! typed [`AssetConfig`] the presentation layer renders from.
//!
//! # Architecture
//!
//! - **Handles** are session-scoped URLs (`blob:stocking/<uuid>`) minted by a
//!   [`HandleFactory`] for every stored payload. They are never persisted;
//!   only keys are. [`SessionHandles`] keeps the payload behind each live
//!   handle and revokes handles the current configuration no longer uses.
//! - **Bundled defaults** ([`BundledAssets`]) fill every slot the store has no
//!   override for. Absent means "use the bundled default", never "silent".
//! - **The model** ([`AssetModel`]) holds the current configuration and
//!   applies pure-merge updates.
//!
//! # Modules
//!
//! - [`error`] — Error types for resolution
//! - [`handle`] — [`AssetHandle`], the [`HandleFactory`] trait, [`SessionHandles`]
//! - [`bundled`] — Bundled default asset locations
//! - [`model`] — [`AssetRef`], [`AssetConfig`], [`AssetUpdate`], [`AssetModel`]
//! - [`resolver`] — The [`Resolver`] that builds configurations from a store

pub mod bundled;
pub mod error;
pub mod handle;
pub mod model;
pub mod resolver;

pub use bundled::BundledAssets;
pub use error::{ResolveError, ResolveResult};
pub use handle::{AssetHandle, HandleFactory, SessionHandles};
pub use model::{AssetConfig, AssetModel, AssetRef, AssetUpdate, AudioRefs};
pub use resolver::Resolver;

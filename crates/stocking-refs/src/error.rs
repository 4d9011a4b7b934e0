//! Error types for reference resolution.

use stocking_store::StoreError;
use thiserror::Error;

/// Errors that can occur while resolving asset references.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Enumerating the store failed. An empty store is not an error.
    #[error("failed to load assets: {0}")]
    LoadFailed(#[from] StoreError),
}

/// Convenience type alias for resolution operations.
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

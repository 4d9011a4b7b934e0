use crate::error::StoreResult;
use crate::record::{Record, StoredAsset};

/// Durable keyed store for binary assets.
///
/// All implementations must satisfy these invariants:
/// - At most one record per key; `put` on an existing key replaces it.
/// - `put_batch` either commits every supplied entry or none of them, and
///   leaves keys outside the batch untouched.
/// - `get_all` makes no ordering promise.
/// - Opening the backend is lazy and idempotent: the first operation
///   establishes the namespace, later ones reuse it.
pub trait AssetStore: Send + Sync {
    /// Store `asset` under `key`, replacing any existing record.
    fn put(&self, key: &str, asset: &StoredAsset) -> StoreResult<()>;

    /// Enumerate every record. Order is unspecified.
    fn get_all(&self) -> StoreResult<Vec<Record>>;

    /// Write all entries in a single transaction.
    ///
    /// Fails with [`StoreError::ImportFailed`] if the transaction does not
    /// commit, in which case the store is unchanged.
    ///
    /// [`StoreError::ImportFailed`]: crate::StoreError::ImportFailed
    fn put_batch(&self, entries: &[Record]) -> StoreResult<()>;

    /// Remove every record.
    fn clear_all(&self) -> StoreResult<()>;

    /// Read a single record.
    ///
    /// Default implementation scans `get_all()`. Backends may override.
    fn get(&self, key: &str) -> StoreResult<Option<StoredAsset>> {
        Ok(self
            .get_all()?
            .into_iter()
            .find_map(|(k, asset)| (k == key).then_some(asset)))
    }

    /// All stored keys, sorted.
    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys: Vec<String> = self.get_all()?.into_iter().map(|(k, _)| k).collect();
        keys.sort();
        Ok(keys)
    }
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::record::{Record, StoredAsset};
use crate::traits::AssetStore;

/// In-memory, HashMap-based asset store.
///
/// Intended for tests and embedding. Records live behind a `RwLock`; batch
/// writes are staged on a copy and swapped in only once every entry has been
/// applied.
///
/// The store can simulate backend failures: [`set_unavailable`] makes every
/// operation fail with `StoreUnavailable`, and [`fail_writes_after`] lets a
/// fixed number of record writes succeed before the next one fails.
///
/// [`set_unavailable`]: InMemoryAssetStore::set_unavailable
/// [`fail_writes_after`]: InMemoryAssetStore::fail_writes_after
pub struct InMemoryAssetStore {
    records: RwLock<HashMap<String, StoredAsset>>,
    unavailable: AtomicBool,
    write_budget: Mutex<Option<usize>>,
}

impl InMemoryAssetStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
            write_budget: Mutex::new(None),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.records.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total payload bytes across all records.
    pub fn total_bytes(&self) -> u64 {
        self.records
            .read()
            .map(|m| m.values().map(StoredAsset::size).sum())
            .unwrap_or(0)
    }

    /// Make every subsequent operation fail with `StoreUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Allow `n` more record writes, then fail the next one.
    ///
    /// A batch is charged as a whole and only when it commits: a batch with
    /// more entries than the remaining budget fails and leaves the budget
    /// as it was. Pass `None` to remove the limit.
    pub fn fail_writes_after(&self, n: Option<usize>) {
        if let Ok(mut budget) = self.write_budget.lock() {
            *budget = n;
        }
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::StoreUnavailable(
                "in-memory store marked unavailable".into(),
            ));
        }
        Ok(())
    }

    /// Consume one unit of the write budget per key, or none at all if
    /// the budget runs out partway.
    fn charge_writes<'a>(
        &self,
        mut keys: impl ExactSizeIterator<Item = &'a str>,
    ) -> Result<(), String> {
        let mut budget = self
            .write_budget
            .lock()
            .map_err(|e| format!("lock poisoned: {e}"))?;
        if let Some(remaining) = budget.as_mut() {
            let count = keys.len();
            if let Some(key) = keys.nth(*remaining) {
                return Err(format!("injected fault writing {key}"));
            }
            *remaining -= count;
        }
        Ok(())
    }
}

impl Default for InMemoryAssetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetStore for InMemoryAssetStore {
    fn put(&self, key: &str, asset: &StoredAsset) -> StoreResult<()> {
        self.check_available()?;
        let mut map = self
            .records
            .write()
            .map_err(|e| StoreError::WriteFailed(format!("lock poisoned: {e}")))?;
        self.charge_writes(std::iter::once(key))
            .map_err(StoreError::WriteFailed)?;
        map.insert(key.to_string(), asset.clone());
        debug!(key, size = asset.size(), "asset stored");
        Ok(())
    }

    fn get_all(&self) -> StoreResult<Vec<Record>> {
        self.check_available()?;
        let map = self
            .records
            .read()
            .map_err(|e| StoreError::ReadFailed(format!("lock poisoned: {e}")))?;
        Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    fn put_batch(&self, entries: &[Record]) -> StoreResult<()> {
        self.check_available()?;
        let mut map = self
            .records
            .write()
            .map_err(|e| StoreError::ImportFailed(format!("lock poisoned: {e}")))?;

        let mut staged = map.clone();
        for (key, asset) in entries {
            staged.insert(key.clone(), asset.clone());
        }
        self.charge_writes(entries.iter().map(|(key, _)| key.as_str()))
            .map_err(StoreError::ImportFailed)?;
        *map = staged;
        debug!(count = entries.len(), "batch committed");
        Ok(())
    }

    fn clear_all(&self) -> StoreResult<()> {
        self.check_available()?;
        let mut map = self
            .records
            .write()
            .map_err(|e| StoreError::WriteFailed(format!("lock poisoned: {e}")))?;
        map.clear();
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<StoredAsset>> {
        self.check_available()?;
        let map = self
            .records
            .read()
            .map_err(|e| StoreError::ReadFailed(format!("lock poisoned: {e}")))?;
        Ok(map.get(key).cloned())
    }
}

impl std::fmt::Debug for InMemoryAssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryAssetStore")
            .field("record_count", &self.len())
            .finish()
    }
}

//! Durable single-file asset store.
//!
//! The whole namespace lives in one data file inside the store directory:
//!
//! ```text
//! [4 bytes: magic "STKA"]
//! [4 bytes: format version (little-endian u32)]
//! [4 bytes: CRC32 of body (little-endian u32)]
//! [N bytes: body (bincode-serialized map of key -> StoredAsset)]
//! ```
//!
//! Every write transaction produces a complete new file in a temp file next
//! to the data file and renames it into place, so a crash or error never
//! leaves a half-applied transaction visible.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::record::{Record, StoredAsset};
use crate::traits::AssetStore;

const MAGIC: &[u8; 4] = b"STKA";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 12;

/// Name of the data file inside the store directory.
pub const DATA_FILE: &str = "assets.db";

type Namespace = BTreeMap<String, StoredAsset>;

/// File-backed asset store rooted at a directory.
///
/// Nothing touches the filesystem until the first operation, which creates
/// the directory and an empty namespace if needed. All operations are
/// serialized through an internal lock.
pub struct FileAssetStore {
    root: PathBuf,
    /// `true` once the namespace has been established.
    opened: Mutex<bool>,
    #[cfg(test)]
    fail_persist: AtomicBool,
}

impl FileAssetStore {
    /// Create a store handle for `root`. Does not touch the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            opened: Mutex::new(false),
            #[cfg(test)]
            fail_persist: AtomicBool::new(false),
        }
    }

    /// The store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the data file.
    pub fn data_path(&self) -> PathBuf {
        self.root.join(DATA_FILE)
    }

    /// Run `f` with the namespace established and the store lock held.
    fn with_open<T>(&self, f: impl FnOnce(&Path) -> StoreResult<T>) -> StoreResult<T> {
        let mut opened = self
            .opened
            .lock()
            .map_err(|e| StoreError::StoreUnavailable(format!("lock poisoned: {e}")))?;
        let path = self.data_path();

        if !*opened {
            fs::create_dir_all(&self.root).map_err(|e| {
                StoreError::StoreUnavailable(format!("{}: {e}", self.root.display()))
            })?;
            if !path.exists() {
                self.write_namespace(&path, &Namespace::new())
                    .map_err(|e| StoreError::StoreUnavailable(e.to_string()))?;
                info!(path = %path.display(), "asset store created");
            }
            *opened = true;
        }

        f(&path)
    }

    /// Atomically replace the data file with `ns`.
    fn write_namespace(&self, path: &Path, ns: &Namespace) -> io::Result<()> {
        let bytes = encode_namespace(ns)?;
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        #[cfg(test)]
        if self.fail_persist.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "injected persist failure"));
        }
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl AssetStore for FileAssetStore {
    fn put(&self, key: &str, asset: &StoredAsset) -> StoreResult<()> {
        self.with_open(|path| {
            let mut ns =
                read_namespace(path).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            ns.insert(key.to_string(), asset.clone());
            self.write_namespace(path, &ns)
                .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            debug!(key, size = asset.size(), "asset stored");
            Ok(())
        })
    }

    fn get_all(&self) -> StoreResult<Vec<Record>> {
        self.with_open(|path| Ok(read_namespace(path)?.into_iter().collect()))
    }

    fn put_batch(&self, entries: &[Record]) -> StoreResult<()> {
        self.with_open(|path| {
            let mut ns =
                read_namespace(path).map_err(|e| StoreError::ImportFailed(e.to_string()))?;
            for (key, asset) in entries {
                ns.insert(key.clone(), asset.clone());
            }
            self.write_namespace(path, &ns)
                .map_err(|e| StoreError::ImportFailed(e.to_string()))?;
            debug!(count = entries.len(), "batch committed");
            Ok(())
        })
    }

    fn clear_all(&self) -> StoreResult<()> {
        self.with_open(|path| {
            self.write_namespace(path, &Namespace::new())
                .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            info!("asset store cleared");
            Ok(())
        })
    }

    fn get(&self, key: &str) -> StoreResult<Option<StoredAsset>> {
        self.with_open(|path| Ok(read_namespace(path)?.remove(key)))
    }
}

impl std::fmt::Debug for FileAssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAssetStore")
            .field("root", &self.root)
            .finish()
    }
}

fn read_namespace(path: &Path) -> StoreResult<Namespace> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Namespace::new()),
        Err(e) => return Err(StoreError::ReadFailed(format!("{}: {e}", path.display()))),
    };
    decode_namespace(&bytes)
}

fn decode_namespace(bytes: &[u8]) -> StoreResult<Namespace> {
    if bytes.len() < HEADER_SIZE {
        return Err(StoreError::ReadFailed("data file truncated".into()));
    }
    if &bytes[0..4] != MAGIC {
        return Err(StoreError::ReadFailed(format!(
            "bad magic: expected {:?}, got {:?}",
            String::from_utf8_lossy(MAGIC),
            String::from_utf8_lossy(&bytes[0..4])
        )));
    }
    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != VERSION {
        return Err(StoreError::ReadFailed(format!(
            "unsupported data file version: {version}"
        )));
    }
    let expected_crc = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    let body = &bytes[HEADER_SIZE..];
    let crc = crc32fast::hash(body);
    if crc != expected_crc {
        return Err(StoreError::ReadFailed(format!(
            "checksum mismatch: expected {expected_crc:08x}, computed {crc:08x}"
        )));
    }
    bincode::deserialize(body).map_err(|e| StoreError::ReadFailed(e.to_string()))
}

fn encode_namespace(ns: &Namespace) -> io::Result<Vec<u8>> {
    let body = bincode::serialize(ns).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let mut out = Vec::with_capacity(HEADER_SIZE + body.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&crc32fast::hash(&body).to_le_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn asset(bytes: &[u8]) -> StoredAsset {
        StoredAsset::new("image/png", bytes.to_vec())
    }

    #[test]
    fn new_does_not_touch_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("lazy");
        let _store = FileAssetStore::new(&root);
        assert!(!root.exists());
    }

    #[test]
    fn first_operation_creates_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAssetStore::new(dir.path().join("assets"));
        assert!(store.get_all().unwrap().is_empty());
        assert!(store.data_path().exists());

        // Reopening is idempotent and keeps contents.
        store.put("bg", &asset(b"x")).unwrap();
        let again = FileAssetStore::new(store.root());
        assert_eq!(again.get_all().unwrap().len(), 1);
    }

    #[test]
    fn put_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileAssetStore::new(dir.path());
            store.put("gift_7", &asset(b"seven")).unwrap();
            store
                .put("audio_bgm", &StoredAsset::new("audio/mpeg", vec![1, 2, 3]))
                .unwrap();
        }
        let store = FileAssetStore::new(dir.path());
        assert_eq!(store.get("gift_7").unwrap(), Some(asset(b"seven")));
        assert_eq!(
            store.get("audio_bgm").unwrap().unwrap().media_type.as_str(),
            "audio/mpeg"
        );
        assert_eq!(store.keys().unwrap(), vec!["audio_bgm", "gift_7"]);
    }

    #[test]
    fn put_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAssetStore::new(dir.path());
        store.put("sock", &asset(b"first")).unwrap();
        store.put("sock", &asset(b"second")).unwrap();
        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].1.data, b"second");
    }

    #[test]
    fn batch_keeps_existing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAssetStore::new(dir.path());
        store.put("bg", &asset(b"bg")).unwrap();
        store
            .put_batch(&[
                ("gift_1".into(), asset(b"1")),
                ("bg".into(), asset(b"bg2")),
            ])
            .unwrap();
        assert_eq!(store.keys().unwrap(), vec!["bg", "gift_1"]);
        assert_eq!(store.get("bg").unwrap().unwrap().data, b"bg2");
    }

    #[test]
    fn clear_all_empties() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAssetStore::new(dir.path());
        store.put("bg", &asset(b"bg")).unwrap();
        store.clear_all().unwrap();
        assert!(store.get_all().unwrap().is_empty());
        assert!(store.data_path().exists());
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAssetStore::new(dir.path());
        store.put("bg", &asset(b"bg")).unwrap();
        store.put_batch(&[("sock".into(), asset(b"s"))]).unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(DATA_FILE)]);
    }

    #[test]
    fn root_that_is_a_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let store = FileAssetStore::new(&blocker);
        let err = store.get_all().unwrap_err();
        assert!(err.is_unavailable());
        let err = store.put("bg", &asset(b"x")).unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn corrupt_checksum_is_read_failed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAssetStore::new(dir.path());
        store.put("bg", &asset(b"payload")).unwrap();

        let mut bytes = fs::read(store.data_path()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        fs::write(store.data_path(), &bytes).unwrap();

        let err = store.get_all().unwrap_err();
        assert!(matches!(err, StoreError::ReadFailed(_)));
    }

    #[test]
    fn corrupt_magic_is_read_failed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DATA_FILE), b"BADMxxxxxxxxxxxx").unwrap();
        let store = FileAssetStore::new(dir.path());
        assert!(matches!(
            store.get_all().unwrap_err(),
            StoreError::ReadFailed(_)
        ));
    }

    #[test]
    fn failed_batch_read_reports_import_failed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAssetStore::new(dir.path());
        store.put("bg", &asset(b"x")).unwrap();
        fs::write(store.data_path(), b"garbage").unwrap();

        let err = store
            .put_batch(&[("sock".into(), asset(b"s"))])
            .unwrap_err();
        assert!(matches!(err, StoreError::ImportFailed(_)));
        // The corrupt file was not replaced by a partial namespace.
        assert_eq!(fs::read(store.data_path()).unwrap(), b"garbage");
    }

    #[test]
    fn unreadable_file_fails_put_as_write_failed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAssetStore::new(dir.path());
        store.put("bg", &asset(b"x")).unwrap();
        fs::write(store.data_path(), b"garbage").unwrap();

        let err = store.put("sock", &asset(b"s")).unwrap_err();
        assert!(matches!(err, StoreError::WriteFailed(_)));
        assert_eq!(fs::read(store.data_path()).unwrap(), b"garbage");
    }

    #[test]
    fn failed_batch_write_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAssetStore::new(dir.path());
        store.put("bg", &asset(b"before")).unwrap();
        let before = fs::read(store.data_path()).unwrap();

        store.fail_persist.store(true, Ordering::SeqCst);
        let err = store
            .put_batch(&[
                ("bg".into(), asset(b"after")),
                ("gift_1".into(), asset(b"one")),
                ("gift_2".into(), asset(b"two")),
            ])
            .unwrap_err();
        assert!(matches!(err, StoreError::ImportFailed(_)));
        let err = store.put("sock", &asset(b"s")).unwrap_err();
        assert!(matches!(err, StoreError::WriteFailed(_)));
        let err = store.clear_all().unwrap_err();
        assert!(matches!(err, StoreError::WriteFailed(_)));

        assert_eq!(fs::read(store.data_path()).unwrap(), before);
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(DATA_FILE)]);

        store.fail_persist.store(false, Ordering::SeqCst);
        let reopened = FileAssetStore::new(dir.path());
        assert_eq!(reopened.keys().unwrap(), vec!["bg"]);
        assert_eq!(reopened.get("bg").unwrap().unwrap().data, b"before");
    }

    #[test]
    fn truncated_file_is_read_failed() {
        assert!(matches!(
            decode_namespace(&[1, 2, 3]).unwrap_err(),
            StoreError::ReadFailed(_)
        ));
    }

    #[test]
    fn encode_decode_namespace() {
        let mut ns = Namespace::new();
        ns.insert("bg".into(), asset(b"background"));
        ns.insert("gift_3".into(), StoredAsset::new("", vec![0, 255, 7]));
        let bytes = encode_namespace(&ns).unwrap();
        assert_eq!(&bytes[0..4], MAGIC);
        assert_eq!(decode_namespace(&bytes).unwrap(), ns);
    }
}

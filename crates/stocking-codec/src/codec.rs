use serde::Serialize;
use stocking_store::{AssetStore, Record};
use tracing::{info, warn};

use crate::document::PortableDocument;
use crate::error::{CodecError, CodecResult};

/// Encode `records` into document text.
///
/// Fails with `ExportFailed` if any payload cannot be encoded.
pub fn export(records: &[Record]) -> CodecResult<String> {
    PortableDocument::from_records(records)?.to_json()
}

/// Read every record from `store` and encode them.
pub fn export_store(store: &dyn AssetStore) -> CodecResult<String> {
    let records = store.get_all()?;
    let text = export(&records)?;
    info!(count = records.len(), bytes = text.len(), "assets exported");
    Ok(text)
}

/// An entry that was dropped during import.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub key: String,
    pub reason: String,
}

/// Result of decoding a document: the entries that decoded and the ones
/// that did not.
#[derive(Clone, Debug, Default)]
pub struct DecodedDocument {
    pub entries: Vec<Record>,
    pub skipped: Vec<SkippedEntry>,
}

/// Outcome of a successful import.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Keys written to the store.
    pub written: Vec<String>,
    /// Entries that failed to decode and were left out.
    pub skipped: Vec<SkippedEntry>,
}

/// Parse and decode document text.
///
/// Fails with `InvalidFormat` only when the text is not a flat JSON object.
/// Entries whose value does not decode are logged and skipped.
pub fn decode_document(text: &str) -> CodecResult<DecodedDocument> {
    let raw = PortableDocument::parse_raw(text)?;
    let mut decoded = DecodedDocument::default();

    for (key, value) in raw {
        match PortableDocument::decode_value(&value) {
            Ok(asset) => decoded.entries.push((key, asset)),
            Err(e) => {
                warn!(key = %key, error = %e, "skipping undecodable entry");
                decoded.skipped.push(SkippedEntry {
                    key,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(decoded)
}

/// Decode `text` and write the surviving entries to `store` in one batch.
///
/// An invalid document leaves the store untouched. A document where every
/// entry fails to decode still succeeds, with an empty batch.
pub fn import(store: &dyn AssetStore, text: &str) -> CodecResult<ImportReport> {
    let DecodedDocument { entries, skipped } = decode_document(text)?;

    store.put_batch(&entries).map_err(CodecError::ImportFailed)?;

    let written: Vec<String> = entries.into_iter().map(|(key, _)| key).collect();
    info!(
        written = written.len(),
        skipped = skipped.len(),
        "assets imported"
    );
    Ok(ImportReport { written, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stocking_store::{InMemoryAssetStore, StoreError, StoredAsset};

    fn png(bytes: &[u8]) -> StoredAsset {
        StoredAsset::new("image/png", bytes.to_vec())
    }

    fn sorted(mut records: Vec<Record>) -> Vec<Record> {
        records.sort_by(|a, b| a.0.cmp(&b.0));
        records
    }

    #[test]
    fn export_then_import_into_empty_store() {
        let source = InMemoryAssetStore::new();
        source.put("bg", &png(b"background")).unwrap();
        source.put("gift_7", &png(&[0, 1, 2, 255])).unwrap();
        source
            .put("audio_bgm", &StoredAsset::new("audio/mpeg", vec![7; 300]))
            .unwrap();

        let text = export_store(&source).unwrap();

        let target = InMemoryAssetStore::new();
        let report = import(&target, &text).unwrap();
        assert_eq!(report.written.len(), 3);
        assert!(report.skipped.is_empty());
        assert_eq!(
            sorted(target.get_all().unwrap()),
            sorted(source.get_all().unwrap())
        );
    }

    #[test]
    fn one_bad_entry_two_good() {
        let text = r#"{
            "bg": "data:image/png;base64,YmFja2dyb3VuZA==",
            "gift_3": "not a data url",
            "sock": "data:image/png;base64,c29jaw=="
        }"#;
        let store = InMemoryAssetStore::new();
        let report = import(&store, text).unwrap();

        assert_eq!(report.written, vec!["bg", "sock"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].key, "gift_3");
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("sock").unwrap().unwrap().data, b"sock");
    }

    #[test]
    fn non_string_value_is_skipped() {
        let store = InMemoryAssetStore::new();
        let report = import(&store, r#"{"bg": 42, "sock": "data:,s"}"#).unwrap();
        assert_eq!(report.written, vec!["sock"]);
        assert_eq!(report.skipped[0].key, "bg");
    }

    #[test]
    fn invalid_text_leaves_store_unchanged() {
        let store = InMemoryAssetStore::new();
        store.put("bg", &png(b"keep")).unwrap();

        let err = import(&store, "not json").unwrap_err();
        assert!(matches!(err, CodecError::InvalidFormat(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("bg").unwrap().unwrap().data, b"keep");
    }

    #[test]
    fn all_entries_bad_is_empty_success() {
        let store = InMemoryAssetStore::new();
        store.put("bg", &png(b"keep")).unwrap();
        let report = import(&store, r#"{"gift_1": "garbage", "gift_2": null}"#).unwrap();
        assert!(report.written.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn import_overwrites_but_never_deletes() {
        let store = InMemoryAssetStore::new();
        store.put("bg", &png(b"old bg")).unwrap();
        store.put("sock", &png(b"old sock")).unwrap();

        import(&store, r#"{"bg": "data:image/png;base64,bmV3"}"#).unwrap();
        assert_eq!(store.get("bg").unwrap().unwrap().data, b"new");
        assert_eq!(store.get("sock").unwrap().unwrap().data, b"old sock");
    }

    #[test]
    fn failed_batch_is_import_failed_and_store_unchanged() {
        let store = InMemoryAssetStore::new();
        store.put("bg", &png(b"before")).unwrap();
        store.fail_writes_after(Some(1));

        let text = r#"{
            "bg": "data:image/png;base64,YWZ0ZXI=",
            "sock": "data:image/png;base64,c29jaw=="
        }"#;
        let err = import(&store, text).unwrap_err();
        assert!(matches!(
            err,
            CodecError::ImportFailed(StoreError::ImportFailed(_))
        ));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("bg").unwrap().unwrap().data, b"before");
    }

    #[test]
    fn export_failure_produces_nothing() {
        let store = InMemoryAssetStore::new();
        store.put("bg", &png(b"fine")).unwrap();
        store
            .put("gift_1", &StoredAsset::new("image/png, broken", vec![1]))
            .unwrap();
        let err = export_store(&store).unwrap_err();
        assert!(matches!(err, CodecError::ExportFailed { .. }));
    }

    #[test]
    fn export_of_unavailable_store() {
        let store = InMemoryAssetStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            export_store(&store).unwrap_err(),
            CodecError::Store(StoreError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn export_empty_store() {
        let store = InMemoryAssetStore::new();
        assert_eq!(export_store(&store).unwrap(), "{}");
        let target = InMemoryAssetStore::new();
        let report = import(&target, "{}").unwrap();
        assert!(report.written.is_empty());
        assert!(target.is_empty());
    }
}

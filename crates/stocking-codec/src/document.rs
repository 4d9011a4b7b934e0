use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stocking_store::Record;

use crate::dataurl::{decode_data_url, encode_data_url};
use crate::error::{CodecError, CodecResult, DataUrlError};

/// A flat key → data URL mapping, serialized as one JSON object.
///
/// Keys are kept sorted so the same store content always produces the
/// same document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortableDocument {
    entries: BTreeMap<String, String>,
}

impl PortableDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode every record. Fails on the first payload that cannot be
    /// encoded; no partial document is returned.
    pub fn from_records(records: &[Record]) -> CodecResult<Self> {
        let mut entries = BTreeMap::new();
        for (key, asset) in records {
            let url = encode_data_url(asset).map_err(|e| CodecError::ExportFailed {
                key: key.clone(),
                reason: e.to_string(),
            })?;
            entries.insert(key.clone(), url);
        }
        Ok(Self { entries })
    }

    /// Parse document text. Values are kept as raw JSON so that a bad
    /// value only affects its own entry.
    pub fn parse_raw(text: &str) -> CodecResult<BTreeMap<String, Value>> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| CodecError::InvalidFormat(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(CodecError::InvalidFormat(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Decode one raw entry value into a payload.
    pub fn decode_value(value: &Value) -> Result<stocking_store::StoredAsset, DataUrlError> {
        match value {
            Value::String(url) => decode_data_url(url),
            _ => Err(DataUrlError::NotAString),
        }
    }

    pub fn to_json(&self) -> CodecResult<String> {
        serde_json::to_string(self).map_err(|e| CodecError::ExportFailed {
            key: String::new(),
            reason: e.to_string(),
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stocking_store::StoredAsset;

    #[test]
    fn from_records_is_sorted_json() {
        let records = vec![
            ("sock".to_string(), StoredAsset::new("image/png", b"s".to_vec())),
            ("bg".to_string(), StoredAsset::new("image/png", b"b".to_vec())),
        ];
        let doc = PortableDocument::from_records(&records).unwrap();
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["bg", "sock"]);
        assert_eq!(
            doc.to_json().unwrap(),
            r#"{"bg":"data:image/png;base64,Yg==","sock":"data:image/png;base64,cw=="}"#
        );
    }

    #[test]
    fn from_records_fails_whole_export() {
        let records = vec![
            ("bg".to_string(), StoredAsset::new("image/png", b"b".to_vec())),
            ("gift_2".to_string(), StoredAsset::new("bad,type", b"x".to_vec())),
        ];
        let err = PortableDocument::from_records(&records).unwrap_err();
        match err {
            CodecError::ExportFailed { key, .. } => assert_eq!(key, "gift_2"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_document() {
        let doc = PortableDocument::from_records(&[]).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.to_json().unwrap(), "{}");
    }

    #[test]
    fn parse_raw_requires_object() {
        assert!(matches!(
            PortableDocument::parse_raw("not json").unwrap_err(),
            CodecError::InvalidFormat(_)
        ));
        assert!(matches!(
            PortableDocument::parse_raw("[1, 2]").unwrap_err(),
            CodecError::InvalidFormat(_)
        ));
        assert!(matches!(
            PortableDocument::parse_raw("\"data:,x\"").unwrap_err(),
            CodecError::InvalidFormat(_)
        ));
        assert!(PortableDocument::parse_raw("{}").unwrap().is_empty());
    }

    #[test]
    fn decode_value_rejects_non_strings() {
        assert_eq!(
            PortableDocument::decode_value(&Value::Bool(true)).unwrap_err(),
            DataUrlError::NotAString
        );
        assert_eq!(
            PortableDocument::decode_value(&Value::String("data:,x".into()))
                .unwrap()
                .data,
            b"x"
        );
    }
}

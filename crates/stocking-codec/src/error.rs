use stocking_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// A payload could not be encoded. No document is produced.
    #[error("export failed at {key}: {reason}")]
    ExportFailed { key: String, reason: String },

    /// The import text is not a flat JSON object.
    #[error("invalid backup document: {0}")]
    InvalidFormat(String),

    /// The decoded entries could not be committed. The store is unchanged.
    #[error("import failed: {0}")]
    ImportFailed(#[source] StoreError),

    /// Enumerating the store for export failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Why a single data URL could not be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("missing data: scheme")]
    MissingScheme,

    #[error("missing ',' separator")]
    MissingSeparator,

    #[error("invalid base64: {0}")]
    InvalidBase64(String),

    #[error("invalid media type: {0}")]
    InvalidMediaType(String),

    #[error("expected a string value")]
    NotAString,
}

/// Errors from asset store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The persistence backend could not be opened or initialized.
    #[error("asset store unavailable: {0}")]
    StoreUnavailable(String),

    /// A read from the backend failed or returned undecodable data.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// A single-record write or a clear failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// A batch write failed and nothing from the batch was committed.
    #[error("import failed: {0}")]
    ImportFailed(String),
}

impl StoreError {
    /// Whether this error means the backend itself is unusable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

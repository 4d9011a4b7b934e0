use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid asset: {0}")]
    Type(#[from] stocking_types::TypeError),

    #[error("store error: {0}")]
    Store(#[from] stocking_store::StoreError),

    #[error("resolve error: {0}")]
    Resolve(#[from] stocking_refs::ResolveError),

    #[error("codec error: {0}")]
    Codec(#[from] stocking_codec::CodecError),

    #[error("slot {slot} out of range (board has {total} slots)")]
    InvalidSlot { slot: usize, total: usize },

    #[error("slot {0} already opened")]
    AlreadyOpened(usize),

    #[error("config error: {0}")]
    Config(String),
}

pub type SdkResult<T> = Result<T, SdkError>;

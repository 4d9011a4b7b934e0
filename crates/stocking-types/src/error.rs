use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("prize id out of range: {0} (expected 1..={max})", max = crate::TOTAL_PRIZES)]
    PrizeOutOfRange(u32),

    #[error("unrecognized asset key: {0}")]
    UnknownKey(String),

    #[error("unknown audio channel: {0}")]
    UnknownChannel(String),

    #[error("invalid media type: {0}")]
    InvalidMediaType(String),
}

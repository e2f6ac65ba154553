use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File ended during compaction: copied {copied} of {expected} bytes")]
    ShortRead { expected: u64, copied: u64 },

    #[error("Invalid watermark: min {min} exceeds max {max}")]
    InvertedWatermark { min: u64, max: u64 },
}

pub type Result<T> = std::result::Result<T, LedgerError>;

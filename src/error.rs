//src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SplitError>;

/// Every failure here is fatal to the pass; nothing is retried or skipped.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("label file line {line}: taxonomy code {code:?} has no category mapping")]
    UnmappedCategory { code: String, line: usize },

    #[error("record {record}: FASTA header does not contain label key {key:?} (header: {header})")]
    StreamDesynchronization {
        record: u64,
        key: String,
        header: String,
    },

    #[error("record {record}: FASTA header has no matching label row (label file exhausted)")]
    LabelStreamExhausted { record: u64 },

    #[error("label file line {line}: malformed row ({reason}, {fields} field(s))")]
    MalformedLabelRow {
        line: usize,
        fields: usize,
        reason: &'static str,
    },

    #[error("invalid category {value:?}, expected one of: {expected}")]
    InvalidCategoryArgument { value: String, expected: String },
}

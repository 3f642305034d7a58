//src/classify.rs

use crate::error::{Result, SplitError};
use crate::types::{CoarseCategory, LabelRecord};

/// Longest header excerpt quoted in a desynchronization error.
const HEADER_EXCERPT_LEN: usize = 120;

/// Decides, once per FASTA header, whether that record is kept.
#[derive(Debug, Clone, Copy)]
pub struct RecordClassifier {
    requested: CoarseCategory,
}

impl RecordClassifier {
    pub fn new(requested: CoarseCategory) -> Self {
        Self { requested }
    }

    pub fn requested(&self) -> CoarseCategory {
        self.requested
    }

    /// Returns `true` iff `label` belongs to the requested category.
    ///
    /// `header` must contain `label.key`; anything else means the label
    /// file and the FASTA stream no longer describe the same record.
    /// `record` is the 1-based header ordinal, used only for the error.
    pub fn classify(&self, header: &[u8], label: &LabelRecord, record: u64) -> Result<bool> {
        if !header_contains_key(header, label.key.as_bytes()) {
            return Err(SplitError::StreamDesynchronization {
                record,
                key: label.key.clone(),
                header: header_excerpt(header),
            });
        }
        Ok(label.category == self.requested)
    }
}

/// Plain substring test on raw bytes.
pub fn header_contains_key(header: &[u8], key: &[u8]) -> bool {
    if key.is_empty() {
        return true;
    }
    if key.len() > header.len() {
        return false;
    }
    header.windows(key.len()).any(|w| w == key)
}

fn header_excerpt(header: &[u8]) -> String {
    let trimmed = header
        .strip_suffix(b"\n")
        .map(|h| h.strip_suffix(b"\r").unwrap_or(h))
        .unwrap_or(header);
    let text = String::from_utf8_lossy(trimmed);
    if text.chars().count() > HEADER_EXCERPT_LEN {
        let cut: String = text.chars().take(HEADER_EXCERPT_LEN).collect();
        format!("{cut}...")
    } else {
        text.into_owned()
    }
}

//src/config.rs

use std::path::PathBuf;

use crate::types::CoarseCategory;

/// Rows pulled from the label file per refill (the script's bulk size).
pub const DEFAULT_LABEL_BATCH_SIZE: usize = 10_000;
pub const DEFAULT_IO_BUFFER_BYTES: usize = 1 << 20;
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Parameters for one filtering pass.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Tab-delimited label file, one row per FASTA record.
    pub labels_path: PathBuf,
    /// Category whose records are kept.
    pub category: CoarseCategory,
    /// FASTA input; stdin when `None`.
    pub fasta_path: Option<PathBuf>,
    /// Output; stdout when `None`.
    pub output_path: Option<PathBuf>,
    pub label_batch_size: usize,
    pub io_buffer_bytes: usize,
    /// Headers between progress ticks.
    pub progress_interval: u64,
}

impl SplitConfig {
    pub fn new<P: Into<PathBuf>>(labels_path: P, category: CoarseCategory) -> Self {
        Self {
            labels_path: labels_path.into(),
            category,
            fasta_path: None,
            output_path: None,
            label_batch_size: DEFAULT_LABEL_BATCH_SIZE,
            io_buffer_bytes: DEFAULT_IO_BUFFER_BYTES,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn with_fasta<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.fasta_path = Some(path.into());
        self
    }

    pub fn with_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_label_batch_size(mut self, rows: usize) -> Self {
        self.label_batch_size = rows.max(1);
        self
    }
}

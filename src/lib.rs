// src/lib.rs
pub mod types;
pub mod error;
pub mod category_map;
pub mod labels;
pub mod classify;
pub mod filter;
pub mod config;
pub mod io;

use std::io::{BufRead, Write};

use indicatif::ProgressBar;

pub use crate::category_map::CategoryMap;
pub use crate::classify::RecordClassifier;
pub use crate::config::SplitConfig;
pub use crate::error::{Result, SplitError};
pub use crate::filter::FastaStreamFilter;
pub use crate::labels::LabelSource;
pub use crate::types::{CoarseCategory, LabelRecord, ScanState, SplitStats};

/// Runs one pass over already-open streams.
///
/// `labels` and `fasta` must describe the same records in the same order;
/// the pass aborts on the first row or header that breaks that.
pub fn split_streams<L, F, W>(
    labels: L,
    fasta: F,
    output: W,
    category: CoarseCategory,
    label_batch_size: usize,
) -> Result<SplitStats>
where
    L: BufRead,
    F: BufRead,
    W: Write,
{
    let source = LabelSource::new(labels, CategoryMap::canonical(), label_batch_size);
    FastaStreamFilter::new(source, RecordClassifier::new(category)).run(fasta, output)
}

/// Opens the streams named in `config` and runs one pass, reporting
/// progress on `progress`.
pub fn split_archive(config: &SplitConfig, progress: ProgressBar) -> Result<SplitStats> {
    log::info!(
        "Label file: {}, FASTA: {}",
        config.labels_path.display(),
        config
            .fasta_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<stdin>".to_string())
    );

    let labels = io::open_input(Some(config.labels_path.as_path()), config.io_buffer_bytes)?;
    let fasta = io::open_input(config.fasta_path.as_deref(), config.io_buffer_bytes)?;
    let output = io::open_output(config.output_path.as_deref(), config.io_buffer_bytes)?;

    let source = LabelSource::new(labels, CategoryMap::canonical(), config.label_batch_size);
    FastaStreamFilter::new(source, RecordClassifier::new(config.category))
        .with_progress(progress, config.progress_interval)
        .run(fasta, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: &str = "seq1\tX\tPRI\nseq2\tX\tBCT\n";
    const FASTA: &str = ">seq1 desc\nACGT\n>seq2 desc\nTTTT\n";

    #[test]
    fn test_split_streams_keeps_mammals() {
        let mut out = Vec::new();
        let stats = split_streams(
            LABELS.as_bytes(),
            FASTA.as_bytes(),
            &mut out,
            CoarseCategory::Mam,
            10,
        )
        .expect("split failed");
        assert_eq!(String::from_utf8(out).unwrap(), ">seq1 desc\nACGT\n");
        assert_eq!(stats.records_seen, 2);
        assert_eq!(stats.records_kept, 1);
    }

    #[test]
    fn test_split_archive_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let labels = dir.path().join("labels.tsv");
        let fasta = dir.path().join("db.fa");
        let out = dir.path().join("bct.fa");
        std::fs::write(&labels, LABELS).unwrap();
        std::fs::write(&fasta, FASTA).unwrap();

        let cfg = SplitConfig::new(&labels, CoarseCategory::Bct)
            .with_fasta(&fasta)
            .with_output(&out);
        let stats = split_archive(&cfg, ProgressBar::hidden()).unwrap();
        assert_eq!(stats.records_kept, 1);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), ">seq2 desc\nTTTT\n");
    }
}

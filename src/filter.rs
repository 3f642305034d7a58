//src/filter.rs

use std::io::{BufRead, Write};

use indicatif::ProgressBar;

use crate::classify::RecordClassifier;
use crate::error::{Result, SplitError};
use crate::types::{LabelRecord, ScanState, SplitStats};

/// Single forward pass over a FASTA stream, pulling one label per header.
///
/// Each record's fate is decided at its header and applied unchanged to every
/// following line until the next header. Kept lines are written immediately
/// and byte-for-byte, so an aborted pass leaves a valid prefix of the output.
pub struct FastaStreamFilter<L> {
    labels: L,
    classifier: RecordClassifier,
    state: ScanState,
    stats: SplitStats,
    progress: ProgressBar,
    progress_interval: u64,
}

impl<L> FastaStreamFilter<L>
where
    L: Iterator<Item = Result<LabelRecord>>,
{
    pub fn new(labels: L, classifier: RecordClassifier) -> Self {
        Self {
            labels,
            classifier,
            state: ScanState::AwaitingHeader,
            stats: SplitStats::default(),
            progress: ProgressBar::hidden(),
            progress_interval: 0,
        }
    }

    /// Ticks `progress` every `interval` headers (0 disables ticking).
    pub fn with_progress(mut self, progress: ProgressBar, interval: u64) -> Self {
        self.progress = progress;
        self.progress_interval = interval;
        self
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn stats(&self) -> &SplitStats {
        &self.stats
    }

    /// Scans `input` to the end, writing kept lines to `output`.
    ///
    /// On error, whatever `output` already buffered is still released when it
    /// is dropped (a `BufWriter` flushes itself), leaving a valid prefix.
    /// Label rows left over after the last header are still parsed: a bad one
    /// fails the pass, valid ones only raise a warning.
    pub fn run<R: BufRead, W: Write>(mut self, mut input: R, mut output: W) -> Result<SplitStats> {
        log::info!(
            "Filtering FASTA records for category {}",
            self.classifier.requested()
        );

        let mut line: Vec<u8> = Vec::with_capacity(4096);
        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            self.process_line(&line, &mut output)?;
        }
        output.flush()?;

        let mut first_extra: Option<LabelRecord> = None;
        for extra in self.labels.by_ref() {
            let label = extra?;
            self.stats.trailing_label_rows += 1;
            first_extra.get_or_insert(label);
        }
        if let Some(label) = first_extra {
            log::warn!(
                "FASTA input ended but the label file has {} more row(s) (first key {:?}, line {})",
                self.stats.trailing_label_rows,
                label.key,
                label.line
            );
        }
        if self.stats.preamble_lines_dropped > 0 {
            log::debug!(
                "Dropped {} line(s) before the first header",
                self.stats.preamble_lines_dropped
            );
        }

        self.progress.finish_and_clear();
        log::info!("{}", self.stats);
        Ok(self.stats)
    }

    /// Handles one raw line, terminator included.
    pub fn process_line<W: Write>(&mut self, line: &[u8], output: &mut W) -> Result<()> {
        self.stats.lines_read += 1;

        if line.first() == Some(&b'>') {
            let keep = self.decide(line)?;
            self.state = ScanState::InRecord { keep };
        } else if self.state == ScanState::AwaitingHeader {
            self.stats.preamble_lines_dropped += 1;
        }

        if self.state.keep() {
            output.write_all(line)?;
            self.stats.lines_written += 1;
            self.stats.bytes_written += line.len() as u64;
        }
        Ok(())
    }

    /// Consumes the next label for `header` and returns the keep flag.
    fn decide(&mut self, header: &[u8]) -> Result<bool> {
        self.stats.records_seen += 1;
        let record = self.stats.records_seen;

        let label = self
            .labels
            .next()
            .ok_or(SplitError::LabelStreamExhausted { record })??;
        let keep = self.classifier.classify(header, &label, record)?;

        if keep {
            self.stats.records_kept += 1;
        }
        if self.progress_interval > 0 && record % self.progress_interval == 0 {
            self.progress.set_message(format!(
                "{} records scanned, {} kept",
                record, self.stats.records_kept
            ));
            self.progress.tick();
        }
        Ok(keep)
    }
}

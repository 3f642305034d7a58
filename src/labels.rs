//src/labels.rs

use std::collections::VecDeque;
use std::io::BufRead;

use crate::category_map::CategoryMap;
use crate::error::{Result, SplitError};
use crate::types::LabelRecord;

/// Parses one label-file row in the format:
/// ```text
/// <record id>\t<unused>\t<division code>[\t...]
/// ```
/// The line terminator must already be stripped.
pub fn parse_label_row(row: &str, line: usize, categories: &CategoryMap) -> Result<LabelRecord> {
    let fields: Vec<&str> = row.split('\t').collect();
    if fields.len() < 3 {
        return Err(SplitError::MalformedLabelRow {
            line,
            fields: fields.len(),
            reason: "expected at least 3 tab-separated fields",
        });
    }
    if fields[0].is_empty() {
        return Err(SplitError::MalformedLabelRow {
            line,
            fields: fields.len(),
            reason: "empty record identifier",
        });
    }

    let category = categories.map(fields[2], line)?;
    Ok(LabelRecord {
        key: fields[0].to_string(),
        raw_code: fields[2].trim().to_string(),
        category,
        line,
    })
}

/// Lazy, forward-only stream of `LabelRecord`s, one per non-empty row.
///
/// Rows are pulled from the reader `batch_size` at a time; callers still see
/// exactly one record per `next()`. The first error ends the stream.
pub struct LabelSource<R> {
    reader: R,
    categories: CategoryMap,
    batch_size: usize,
    buffered: VecDeque<Result<LabelRecord>>,
    line_no: usize,
    eof: bool,
    failed: bool,
}

impl<R: BufRead> LabelSource<R> {
    pub fn new(reader: R, categories: CategoryMap, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            reader,
            categories,
            batch_size,
            buffered: VecDeque::with_capacity(batch_size),
            line_no: 0,
            eof: false,
            failed: false,
        }
    }

    /// Reads up to `batch_size` rows into the buffer. Stops early at EOF or
    /// at the first bad row, which is queued so earlier rows are still
    /// delivered first.
    fn refill(&mut self) {
        let mut raw: Vec<u8> = Vec::new();
        let mut loaded = 0;

        while loaded < self.batch_size {
            raw.clear();
            match self.reader.read_until(b'\n', &mut raw) {
                Ok(0) => {
                    self.eof = true;
                    log::debug!("Label file ended after {} line(s)", self.line_no);
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    self.buffered.push_back(Err(e.into()));
                    self.eof = true;
                    break;
                }
            }
            self.line_no += 1;

            let trimmed = trim_line_end(&raw);
            if trimmed.is_empty() {
                continue;
            }
            let row = match std::str::from_utf8(trimmed) {
                Ok(row) => row,
                Err(_) => {
                    self.buffered.push_back(Err(SplitError::MalformedLabelRow {
                        line: self.line_no,
                        fields: trimmed.split(|b| *b == b'\t').count(),
                        reason: "row is not valid UTF-8",
                    }));
                    self.eof = true;
                    break;
                }
            };

            let parsed = parse_label_row(row, self.line_no, &self.categories);
            let bad = parsed.is_err();
            self.buffered.push_back(parsed);
            loaded += 1;
            if bad {
                self.eof = true;
                break;
            }
        }

        log::debug!(
            "Loaded {} label row(s) (through label file line {})",
            loaded,
            self.line_no
        );
    }
}

fn trim_line_end(raw: &[u8]) -> &[u8] {
    let mut end = raw.len();
    while end > 0 && matches!(raw[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    &raw[..end]
}

impl<R: BufRead> Iterator for LabelSource<R> {
    type Item = Result<LabelRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.buffered.is_empty() && !self.eof {
            self.refill();
        }
        let item = self.buffered.pop_front()?;
        if item.is_err() {
            self.failed = true;
            self.buffered.clear();
        }
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CoarseCategory;
    use std::io::Cursor;

    fn source(text: &str, batch: usize) -> LabelSource<Cursor<Vec<u8>>> {
        LabelSource::new(
            Cursor::new(text.as_bytes().to_vec()),
            CategoryMap::canonical(),
            batch,
        )
    }

    #[test]
    fn rows_are_delivered_in_order() {
        let labels: Vec<LabelRecord> = source("seq1\tX\tPRI\nseq2\tX\tBCT\nseq3\t\tPHG\n", 2)
            .collect::<Result<_>>()
            .unwrap();
        let keys: Vec<&str> = labels.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, ["seq1", "seq2", "seq3"]);
        assert_eq!(labels[0].category, CoarseCategory::Mam);
        assert_eq!(labels[0].raw_code, "PRI");
        assert_eq!(labels[1].category, CoarseCategory::Bct);
        assert_eq!(labels[2].category, CoarseCategory::Vrl);
        assert_eq!(labels[2].line, 3);
    }

    #[test]
    fn batch_size_does_not_change_output() {
        let text = "a\t1\tMAM\nb\t2\tINV\n\nc\t3\tVRL\nd\t4\tROD\n";
        let expected: Vec<LabelRecord> = source(text, 1000).collect::<Result<_>>().unwrap();
        for batch in [0, 1, 2, 3] {
            let got: Vec<LabelRecord> = source(text, batch).collect::<Result<_>>().unwrap();
            assert_eq!(got, expected, "batch size {batch}");
        }
    }

    #[test]
    fn blank_rows_and_crlf_are_tolerated() {
        let labels: Vec<LabelRecord> = source("\r\ngi|1\tX\tMAM\r\n\n", 10)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].key, "gi|1");
        assert_eq!(labels[0].line, 2);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let labels: Vec<LabelRecord> = source("k\tX\tSYN\textra\tmore\n", 10)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(labels[0].category, CoarseCategory::Otr);
    }

    #[test]
    fn short_row_is_fatal_and_fuses_the_stream() {
        let mut src = source("ok\tX\tMAM\nbroken\tMAM\nlater\tX\tBCT\n", 10);
        assert!(src.next().unwrap().is_ok());
        match src.next() {
            Some(Err(SplitError::MalformedLabelRow { line, fields, .. })) => {
                assert_eq!(line, 2);
                assert_eq!(fields, 2);
            }
            other => panic!("expected MalformedLabelRow, got {other:?}"),
        }
        assert!(src.next().is_none());
    }

    #[test]
    fn empty_key_is_malformed() {
        let mut src = source("\tX\tMAM\n", 10);
        assert!(matches!(
            src.next(),
            Some(Err(SplitError::MalformedLabelRow { line: 1, .. }))
        ));
    }

    #[test]
    fn unmapped_code_stops_the_stream() {
        let mut src = source("a\tX\tMAM\nb\tX\tQQQ\n", 1);
        assert!(src.next().unwrap().is_ok());
        match src.next() {
            Some(Err(SplitError::UnmappedCategory { code, line })) => {
                assert_eq!(code, "QQQ");
                assert_eq!(line, 2);
            }
            other => panic!("expected UnmappedCategory, got {other:?}"),
        }
        assert!(src.next().is_none());
    }

    #[test]
    fn empty_input_yields_nothing() {
        let mut src = source("", 4);
        assert!(src.next().is_none());
        assert!(src.next().is_none());
    }

    #[test]
    fn non_utf8_row_is_malformed_with_its_line() {
        let mut bytes = b"a\tX\tMAM\n".to_vec();
        bytes.extend_from_slice(b"b\xff\tX\tBCT\n");
        let mut src = LabelSource::new(Cursor::new(bytes), CategoryMap::canonical(), 10);
        assert!(src.next().unwrap().is_ok());
        match src.next() {
            Some(Err(SplitError::MalformedLabelRow { line, fields, reason })) => {
                assert_eq!(line, 2);
                assert_eq!(fields, 3);
                assert!(reason.contains("UTF-8"));
            }
            other => panic!("expected MalformedLabelRow, got {other:?}"),
        }
        assert!(src.next().is_none());
    }
}

//src/types.rs

use std::fmt;
use std::str::FromStr;

use crate::error::SplitError;

/// The coarse output partition that raw division codes collapse into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CoarseCategory {
    /// Mammals, including primates and rodents
    Mam,
    /// Bacteria
    Bct,
    /// Viruses and phages
    Vrl,
    /// Everything else
    Otr,
}

impl CoarseCategory {
    pub const ALL: [CoarseCategory; 4] = [
        CoarseCategory::Mam,
        CoarseCategory::Bct,
        CoarseCategory::Vrl,
        CoarseCategory::Otr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoarseCategory::Mam => "MAM",
            CoarseCategory::Bct => "BCT",
            CoarseCategory::Vrl => "VRL",
            CoarseCategory::Otr => "OTR",
        }
    }
}

impl fmt::Display for CoarseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a user-supplied category name, ignoring case.
impl FromStr for CoarseCategory {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CoarseCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SplitError::InvalidCategoryArgument {
                value: s.to_string(),
                expected: CoarseCategory::ALL
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// One label-file row, already translated to its coarse category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRecord {
    /// Record identifier; must occur somewhere in the matching FASTA header.
    pub key: String,
    /// Raw division code as it appeared in the third column.
    pub raw_code: String,
    pub category: CoarseCategory,
    /// 1-based line number in the label file (for diagnostics).
    pub line: usize,
}

/// Where the FASTA scan currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No header seen yet; lines here are dropped.
    AwaitingHeader,
    /// Inside a record whose fate was decided at its header.
    InRecord { keep: bool },
}

impl ScanState {
    pub fn keep(&self) -> bool {
        matches!(self, ScanState::InRecord { keep: true })
    }
}

/// Counters reported at the end of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitStats {
    pub records_seen: u64,
    pub records_kept: u64,
    pub lines_read: u64,
    pub lines_written: u64,
    pub bytes_written: u64,
    /// Lines before the first header (no record to attach them to).
    pub preamble_lines_dropped: u64,
    /// Valid label rows with no FASTA record left to match.
    pub trailing_label_rows: u64,
}

impl fmt::Display for SplitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} records kept ({} of {} lines, {} bytes written)",
            self.records_kept,
            self.records_seen,
            self.lines_written,
            self.lines_read,
            self.bytes_written
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("mam".parse::<CoarseCategory>().unwrap(), CoarseCategory::Mam);
        assert_eq!(" VRL ".parse::<CoarseCategory>().unwrap(), CoarseCategory::Vrl);
        assert_eq!("Otr".parse::<CoarseCategory>().unwrap(), CoarseCategory::Otr);
    }

    #[test]
    fn unknown_category_is_rejected() {
        // raw division codes are not output categories
        let err = "PRI".parse::<CoarseCategory>().unwrap_err();
        match err {
            SplitError::InvalidCategoryArgument { value, expected } => {
                assert_eq!(value, "PRI");
                assert_eq!(expected, "MAM, BCT, VRL, OTR");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn only_kept_records_report_keep() {
        assert!(!ScanState::AwaitingHeader.keep());
        assert!(!ScanState::InRecord { keep: false }.keep());
        assert!(ScanState::InRecord { keep: true }.keep());
    }
}

//src/category_map.rs

use ahash::AHashMap;

use crate::error::{Result, SplitError};
use crate::types::CoarseCategory;

/// Bumped whenever a row of `DIVISION_TABLE` changes.
pub const TABLE_VERSION: &str = "2";

/// NCBI taxonomy division code -> coarse output category.
///
/// Must cover every code that can show up in the third column of a label
/// file. `UNK`/`UND` are not NCBI divisions but do appear in some exports.
pub const DIVISION_TABLE: &[(&str, CoarseCategory)] = &[
    ("MAM", CoarseCategory::Mam),
    ("ROD", CoarseCategory::Mam),
    ("PRI", CoarseCategory::Mam),
    ("BCT", CoarseCategory::Bct),
    ("PHG", CoarseCategory::Vrl),
    ("VRL", CoarseCategory::Vrl),
    ("INV", CoarseCategory::Otr),
    ("PLN", CoarseCategory::Otr),
    ("SYN", CoarseCategory::Otr),
    ("UNA", CoarseCategory::Otr),
    ("VRT", CoarseCategory::Otr),
    ("ENV", CoarseCategory::Otr),
    ("UNK", CoarseCategory::Otr),
    ("UND", CoarseCategory::Otr),
];

/// Total, many-to-one lookup from raw division code to `CoarseCategory`.
#[derive(Debug, Clone)]
pub struct CategoryMap {
    table: AHashMap<String, CoarseCategory>,
    /// Codes in the order they were supplied, for listing.
    order: Vec<String>,
}

impl CategoryMap {
    /// The built-in table.
    pub fn canonical() -> Self {
        Self::from_pairs(DIVISION_TABLE.iter().copied())
    }

    /// Builds a map from `(code, category)` pairs. A repeated code keeps its last category.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, CoarseCategory)>,
    {
        let mut table = AHashMap::new();
        let mut order = Vec::new();
        for (code, category) in pairs {
            if table.insert(code.to_string(), category).is_none() {
                order.push(code.to_string());
            }
        }
        Self { table, order }
    }

    /// Looks up `raw_code` (surrounding whitespace ignored).
    /// `line` is only used to annotate the error.
    pub fn map(&self, raw_code: &str, line: usize) -> Result<CoarseCategory> {
        self.table
            .get(raw_code.trim())
            .copied()
            .ok_or_else(|| SplitError::UnmappedCategory {
                code: raw_code.to_string(),
                line,
            })
    }

    pub fn codes(&self) -> impl Iterator<Item = (&str, CoarseCategory)> + '_ {
        self.order
            .iter()
            .filter_map(move |code| self.table.get(code).map(|c| (code.as_str(), *c)))
    }

    /// Distinct output categories reachable through this table.
    pub fn categories(&self) -> Vec<CoarseCategory> {
        let mut cats: Vec<CoarseCategory> = self.table.values().copied().collect();
        cats.sort();
        cats.dedup();
        cats
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

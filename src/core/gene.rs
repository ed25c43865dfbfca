//! Gene records and chromosome naming
//!
//! Coordinates are kept exactly as the annotation provides them (GENCODE GTF
//! is 1-based). The locator treats `[start, end)` as the overlap span and
//! compares boundaries inclusively.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single gene interval handed to the locator
///
/// Serializes as the flat `{chrom, start, end, ensg, symbol}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneRecord {
    /// Chromosome name, with or without the "chr" prefix
    pub chrom: String,
    /// Start position
    pub start: u64,
    /// End position
    pub end: u64,
    /// Unique gene id (e.g. `ENSG00000176695.8`)
    #[serde(rename = "ensg", alias = "id")]
    pub id: String,
    /// Gene symbol (e.g. `OR4F17`)
    pub symbol: String,
}

impl GeneRecord {
    pub fn new(
        chrom: impl Into<String>,
        start: u64,
        end: u64,
        id: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            id: id.into(),
            symbol: symbol.into(),
        }
    }

    /// Interval width (`end - start`), zero for malformed records
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tab-separated `chrom start end id symbol`
impl fmt::Display for GeneRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.chrom, self.start, self.end, self.id, self.symbol
        )
    }
}

/// Normalize a chromosome name to its partition key
///
/// Strips a leading lowercase "chr" and maps "MT" to "M". Matching is
/// case-sensitive: "CHR19" is left untouched.
///
/// # Examples
/// ```
/// use gene_locator::core::normalize_chrom;
/// assert_eq!(normalize_chrom("chr19"), "19");
/// assert_eq!(normalize_chrom("19"), "19");
/// assert_eq!(normalize_chrom("chrMT"), "M");
/// assert_eq!(normalize_chrom("chrM"), "M");
/// ```
pub fn normalize_chrom(chrom: &str) -> String {
    let stripped = chrom.strip_prefix("chr").unwrap_or(chrom);
    if stripped == "MT" {
        "M".to_string()
    } else {
        stripped.to_string()
    }
}

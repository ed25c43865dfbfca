//! GeneLocator - find the gene at or nearest to a genomic position
//!
//! Given a chromosome and a coordinate, returns every gene overlapping the
//! position or, when none does, the single closest gene on either side.
//!
//! # Features
//!
//! - Per-chromosome lapper interval index for overlap queries
//! - Sorted start/end boundaries for O(log n) nearest-neighbor fallback
//! - GENCODE GTF ingestion (plain, gzip, bzip2) with gene-type filtering
//! - Compact bincode snapshots of a built locator
//!
//! # Example
//!
//! ```
//! use gene_locator::{GeneLocator, GeneRecord};
//!
//! let locator = GeneLocator::new(vec![
//!     GeneRecord::new("chr19", 107104, 117102, "ENSG00000176695.8", "OR4F17"),
//!     GeneRecord::new("chr19", 168000, 170000, "ENSG00000000002.1", "FAKE1"),
//! ])?;
//!
//! let genes = locator.locate("chr19", 1234)?;
//! assert_eq!(genes[0].symbol, "OR4F17");
//! # Ok::<(), gene_locator::GeneLocatorError>(())
//! ```

pub mod assets;
pub mod core;
pub mod formats;

// Re-export commonly used types
pub use crate::assets::{AssetStore, DatasetKey, FetchPolicy, GenomeBuild};
pub use crate::core::{
    normalize_chrom, BoundaryIndex, DataIntegrityError, GeneLocator, GeneLocatorError,
    GeneRecord, IntervalIndex, LocateError, PointIndex, Result,
};
pub use crate::formats::GeneSet;

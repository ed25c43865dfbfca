//! Core gene location functionality
//!
//! This module contains the boundary index, the interval index and the
//! nearest-gene locator that combines them, plus snapshot and file helpers.

mod boundary;
mod error;
mod gene;
mod index;
pub mod io;
mod locator;
mod snapshot;

pub use boundary::BoundaryIndex;
pub use error::{
    AnnotationError, AnnotationResult, AssetError, AssetResult, BuildResult, DataIntegrityError,
    GeneLocatorError, LocateError, LocateResult, Result, SnapshotError, SnapshotResult,
};
pub use gene::{normalize_chrom, GeneRecord};
pub use index::{GeneSlot, IntervalEntry, IntervalIndex, PointIndex};
pub use io::{open_annotation, CompressionFormat};
pub use locator::GeneLocator;

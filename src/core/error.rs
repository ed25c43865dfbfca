//! Error types for GeneLocator
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for GeneLocator operations
#[derive(Debug, Error)]
pub enum GeneLocatorError {
    /// Locator construction errors
    #[error("Data integrity error: {0}")]
    DataIntegrity(#[from] DataIntegrityError),

    /// Query errors
    #[error("Locate error: {0}")]
    Locate(#[from] LocateError),

    /// Annotation parsing errors
    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    /// Snapshot encode/decode errors
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Cached dataset lookup errors
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building a locator from gene records
///
/// A failed construction never yields a partially built locator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataIntegrityError {
    /// Gene interval has zero or negative width
    #[error("Gene {id} has an invalid interval: start ({start}) must be less than end ({end})")]
    InvalidInterval { id: String, start: u64, end: u64 },

    /// Same gene id seen twice in the input
    #[error("The gene {id} appears multiple times in the gene list")]
    DuplicateId { id: String },

    /// More genes than the slot type can address
    #[error("Too many genes for one locator: {0}")]
    TooManyGenes(usize),
}

/// Errors raised by a query against a built locator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    /// Chromosome has no genes in the index (strict mode)
    #[error("Unknown chromosome: {0}")]
    UnknownChromosome(String),

    /// Nothing overlaps, precedes or follows the position
    #[error("The position chr{chrom}:{position} has no genes before it or after it")]
    NoResultsFound { chrom: String, position: u64 },
}

/// Errors that can occur while reading gene annotations
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// Malformed GTF line
    #[error("Invalid GTF line {line}: {message}")]
    InvalidLine { line: usize, message: String },

    /// Chromosome name the ingester does not know how to handle
    #[error("Unknown chromosome {chrom:?} on line {line}")]
    UnknownChromosome { line: usize, chrom: String },

    /// Required GTF attribute is missing
    #[error("Missing attribute {attribute} on line {line}")]
    MissingAttribute { line: usize, attribute: &'static str },

    /// Malformed JSON gene list
    #[error("Invalid gene list: {0}")]
    InvalidGeneList(#[from] serde_json::Error),

    /// Annotation file not found
    #[error("Annotation file not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error during parsing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while saving or restoring a locator snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// bincode failed to encode or decode the locator
    #[error("Failed to encode or decode snapshot: {0}")]
    Codec(#[from] bincode::Error),

    /// Snapshot decoded but its indexes do not agree with its gene store
    #[error("Snapshot is corrupt: {0}")]
    Corrupt(String),

    /// Snapshot file not found
    #[error("Snapshot file not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while locating a cached dataset
#[derive(Debug, Error)]
pub enum AssetError {
    /// Genome build name not recognized
    #[error("Genome build must be GRCh37, GRCh38, hg19 or hg38, not {0:?}")]
    UnsupportedBuild(String),

    /// GENCODE version not usable with this parser
    #[error("Gencode versions 22 and earlier are not supported (got {0})")]
    UnsupportedGencodeVersion(u32),

    /// GENCODE version string could not be parsed
    #[error("Invalid GENCODE version: {0:?}")]
    InvalidGencodeVersion(String),

    /// No snapshot in the cache and no annotation source to build from
    #[error("Failed to locate requested dataset: {path:?} (annotation available at {url})")]
    NoCachedData { path: PathBuf, url: String },
}

/// Result type alias for GeneLocator operations
pub type Result<T> = std::result::Result<T, GeneLocatorError>;

/// Result type alias for locator construction
pub type BuildResult<T> = std::result::Result<T, DataIntegrityError>;

/// Result type alias for queries
pub type LocateResult<T> = std::result::Result<T, LocateError>;

/// Result type alias for annotation parsing
pub type AnnotationResult<T> = std::result::Result<T, AnnotationError>;

/// Result type alias for snapshot operations
pub type SnapshotResult<T> = std::result::Result<T, SnapshotError>;

/// Result type alias for asset store operations
pub type AssetResult<T> = std::result::Result<T, AssetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_results_message() {
        let err = LocateError::NoResultsFound {
            chrom: "19".to_string(),
            position: 1234,
        };
        assert_eq!(
            err.to_string(),
            "The position chr19:1234 has no genes before it or after it"
        );
    }

    #[test]
    fn test_from_conversions() {
        let err: GeneLocatorError = LocateError::UnknownChromosome("Z".to_string()).into();
        assert!(matches!(err, GeneLocatorError::Locate(LocateError::UnknownChromosome(_))));

        let err: GeneLocatorError = DataIntegrityError::DuplicateId { id: "G1".to_string() }.into();
        assert!(matches!(err, GeneLocatorError::DataIntegrity(_)));
    }
}

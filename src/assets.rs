//! Cached, prebuilt locators
//!
//! Datasets are identified by genome build, GENCODE version and gene set.
//! The store keeps one snapshot per dataset and builds missing ones from a
//! local annotation file when the caller allows it. It never downloads.

use crate::core::{AssetError, AssetResult, GeneLocator, Result};
use crate::formats::{read_gene_list, read_gtf_file, GeneSet};
use log::{info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Oldest GENCODE release the GTF reader cannot handle
pub const MAX_UNSUPPORTED_GENCODE: u32 = 22;

/// Default GENCODE release
pub const DEFAULT_GENCODE_VERSION: u32 = 32;

/// Human reference assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenomeBuild {
    GRCh37,
    GRCh38,
}

impl GenomeBuild {
    /// Numeric GRCh release (37 or 38)
    pub fn number(&self) -> u32 {
        match self {
            GenomeBuild::GRCh37 => 37,
            GenomeBuild::GRCh38 => 38,
        }
    }
}

impl FromStr for GenomeBuild {
    type Err = AssetError;

    /// Accepts GRCh37/hg19 and GRCh38/hg38, case-insensitive
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grch37" | "hg19" => Ok(GenomeBuild::GRCh37),
            "grch38" | "hg38" => Ok(GenomeBuild::GRCh38),
            _ => Err(AssetError::UnsupportedBuild(s.to_string())),
        }
    }
}

impl fmt::Display for GenomeBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GRCh{}", self.number())
    }
}

/// Parse a GENCODE release given as `32` or `gencode32`
///
/// # Examples
/// ```
/// use gene_locator::assets::parse_gencode_version;
/// assert_eq!(parse_gencode_version("gencode32").unwrap(), 32);
/// assert!(parse_gencode_version("22").is_err());
/// ```
pub fn parse_gencode_version(value: &str) -> AssetResult<u32> {
    let lower = value.to_ascii_lowercase();
    let digits = lower.strip_prefix("gencode").unwrap_or(&lower);
    let version: u32 = digits
        .parse()
        .map_err(|_| AssetError::InvalidGencodeVersion(value.to_string()))?;
    if version <= MAX_UNSUPPORTED_GENCODE {
        return Err(AssetError::UnsupportedGencodeVersion(version));
    }
    Ok(version)
}

/// Identity of one prebuilt dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatasetKey {
    pub build: GenomeBuild,
    pub gencode_version: u32,
    pub gene_set: GeneSet,
}

impl DatasetKey {
    pub fn new(build: GenomeBuild, gencode_version: u32, gene_set: GeneSet) -> Self {
        Self {
            build,
            gencode_version,
            gene_set,
        }
    }

    /// Snapshot file name, e.g. `genes-grch38-gencode32-codinglike.bin.gz`
    pub fn file_name(&self) -> String {
        format!(
            "genes-grch{}-gencode{}-{}.bin.gz",
            self.build.number(),
            self.gencode_version,
            self.gene_set.label()
        )
    }

    /// Where GENCODE publishes the annotation for this key
    pub fn gencode_url(&self) -> String {
        let v = self.gencode_version;
        match self.build {
            GenomeBuild::GRCh37 => format!(
                "https://ftp.ebi.ac.uk/pub/databases/gencode/Gencode_human/release_{v}/GRCh37_mapping/gencode.v{v}lift37.annotation.gtf.gz"
            ),
            GenomeBuild::GRCh38 => format!(
                "https://ftp.ebi.ac.uk/pub/databases/gencode/Gencode_human/release_{v}/gencode.v{v}.basic.annotation.gtf.gz"
            ),
        }
    }
}

/// What to do when a dataset is not cached yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Fail with [`AssetError::NoCachedData`]
    CacheOnly,
    /// Build from a local GTF (or JSON gene list), then cache the result
    BuildFrom(PathBuf),
}

/// Directory of locator snapshots
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_path(&self, key: &DatasetKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    pub fn is_cached(&self, key: &DatasetKey) -> bool {
        self.cache_path(key).is_file()
    }

    /// Load a cached locator, or build it according to `policy`
    pub fn load(&self, key: &DatasetKey, policy: &FetchPolicy) -> Result<GeneLocator> {
        let path = self.cache_path(key);
        if path.is_file() {
            info!("Loading cached dataset {:?}", path);
            return Ok(GeneLocator::load_snapshot(&path)?);
        }

        match policy {
            FetchPolicy::CacheOnly => Err(AssetError::NoCachedData {
                path,
                url: key.gencode_url(),
            }
            .into()),
            FetchPolicy::BuildFrom(source) => {
                info!("No cached asset found; building from {:?}", source);
                self.build(key, source)
            }
        }
    }

    /// Build a locator from a local annotation and write it to the cache
    ///
    /// Sources whose name contains `.json` are read as gene lists; anything
    /// else is parsed as GTF and filtered by `key.gene_set`. Gene lists carry
    /// no gene types, so every listed gene is kept: a list cached under a
    /// [`GeneSet::CodingLike`] key must already be restricted to coding-like
    /// genes (as `gene-locator build --coding-only --gene-list` writes it).
    pub fn build(&self, key: &DatasetKey, source: &Path) -> Result<GeneLocator> {
        let genes = if is_gene_list(source) {
            if key.gene_set != GeneSet::All {
                warn!(
                    "Gene list {:?} is cached as {} without gene type filtering",
                    source,
                    key.gene_set.label()
                );
            }
            read_gene_list(source)?
        } else {
            read_gtf_file(source, key.gene_set)?
        };

        let locator = GeneLocator::new(genes)?;
        let path = self.cache_path(key);
        locator.save_snapshot(&path)?;
        info!(
            "Cached {} genes on {} chromosomes at {:?}",
            locator.gene_count(),
            locator.chromosomes().count(),
            path
        );
        Ok(locator)
    }
}

fn is_gene_list(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.contains(".json"))
        .unwrap_or(false)
}

//! GENCODE GTF gene reader
//!
//! Turns the `gene` rows of a GENCODE annotation into [`GeneRecord`]s.
//! GTF uses 1-based closed coordinates; they are passed through unchanged.

use crate::core::{open_annotation, AnnotationError, AnnotationResult, GeneRecord};
use log::{debug, info};
use memchr::memchr;
use std::io::BufRead;
use std::path::Path;

/// Gene types kept by [`GeneSet::CodingLike`]
pub const CODINGLIKE_GENETYPES: &[&str] = &[
    "protein_coding",
    "IG_C_gene",
    "IG_D_gene",
    "IG_J_gene",
    "IG_V_gene",
    "TR_C_gene",
    "TR_D_gene",
    "TR_J_gene",
    "TR_V_gene",
];

/// Which gene types make it into the locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeneSet {
    /// protein_coding + IG_*_gene + TR_*_gene
    #[default]
    CodingLike,
    /// Every gene row
    All,
}

impl GeneSet {
    pub fn allows(&self, gene_type: &str) -> bool {
        match self {
            GeneSet::CodingLike => CODINGLIKE_GENETYPES.contains(&gene_type),
            GeneSet::All => true,
        }
    }

    /// Label used in cache file names
    pub fn label(&self) -> &'static str {
        match self {
            GeneSet::CodingLike => "codinglike",
            GeneSet::All => "all",
        }
    }
}

/// GTF parse error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GtfParseError {
    EmptyLine,
    TooFewFields { expected: usize, found: usize },
    InvalidUtf8(&'static str),
    InvalidNumber(&'static str, String),
}

impl std::fmt::Display for GtfParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GtfParseError::EmptyLine => write!(f, "Empty line"),
            GtfParseError::TooFewFields { expected, found } => {
                write!(f, "Too few fields: expected {}, found {}", expected, found)
            }
            GtfParseError::InvalidUtf8(field) => write!(f, "Invalid UTF-8 in field: {}", field),
            GtfParseError::InvalidNumber(field, value) => {
                write!(f, "Invalid number in field {}: {}", field, value)
            }
        }
    }
}

impl std::error::Error for GtfParseError {}

/// Zero-copy view of one GTF row
///
/// Only the columns the gene reader needs are kept.
#[derive(Debug)]
pub struct GtfRecordView<'a> {
    pub seqname: &'a str,
    pub feature: &'a str,
    /// Start position (1-based)
    pub start: u64,
    /// End position (1-based, inclusive)
    pub end: u64,
    pub attributes: &'a str,
}

impl<'a> GtfRecordView<'a> {
    /// Parse a GTF line; GTF has exactly 9 tab-separated fields
    pub fn parse(line: &'a [u8]) -> Result<Self, GtfParseError> {
        if line.is_empty() {
            return Err(GtfParseError::EmptyLine);
        }

        let mut fields: [&[u8]; 9] = [&[]; 9];
        let mut found = 0;
        let mut rest = line;
        while found < 9 {
            match memchr(b'\t', rest) {
                Some(tab) if found < 8 => {
                    fields[found] = &rest[..tab];
                    rest = &rest[tab + 1..];
                }
                _ => {
                    fields[found] = rest;
                    found += 1;
                    break;
                }
            }
            found += 1;
        }

        if found < 9 {
            return Err(GtfParseError::TooFewFields { expected: 9, found });
        }

        let text = |idx: usize, name: &'static str| -> Result<&'a str, GtfParseError> {
            std::str::from_utf8(fields[idx]).map_err(|_| GtfParseError::InvalidUtf8(name))
        };
        let number = |idx: usize, name: &'static str| -> Result<u64, GtfParseError> {
            let value = text(idx, name)?;
            value
                .parse()
                .map_err(|_| GtfParseError::InvalidNumber(name, value.to_string()))
        };

        Ok(Self {
            seqname: text(0, "seqname")?,
            feature: text(2, "feature")?,
            start: number(3, "start")?,
            end: number(4, "end")?,
            attributes: text(8, "attributes")?,
        })
    }

    /// Value of a `key "value";` attribute
    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        self.attributes.split(';').find_map(|pair| {
            let (k, v) = pair.trim().split_once(' ')?;
            if k != key {
                return None;
            }
            let v = v.trim();
            Some(
                v.strip_prefix('"')
                    .and_then(|quoted| quoted.strip_suffix('"'))
                    .unwrap_or(v),
            )
        })
    }
}

/// Counters reported after reading an annotation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GtfStats {
    /// Non-comment rows
    pub total: usize,
    /// Rows with feature `gene`
    pub genes: usize,
    /// Genes returned
    pub kept: usize,
    /// Genes on unplaced GL contigs
    pub skipped_contigs: usize,
    /// Genes rejected by the gene-type filter
    pub filtered: usize,
}

/// Read all genes of a GENCODE GTF stream
pub fn read_gtf_genes<R: BufRead>(
    reader: R,
    gene_set: GeneSet,
) -> AnnotationResult<(Vec<GeneRecord>, GtfStats)> {
    let mut genes = Vec::new();
    let mut stats = GtfStats::default();

    for (idx, line) in reader.split(b'\n').enumerate() {
        let line_number = idx + 1;
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.is_empty() || line[0] == b'#' {
            continue;
        }
        stats.total += 1;

        let view = GtfRecordView::parse(&line).map_err(|e| AnnotationError::InvalidLine {
            line: line_number,
            message: e.to_string(),
        })?;
        if view.feature != "gene" {
            continue;
        }
        stats.genes += 1;

        if !view.seqname.starts_with("chr") {
            if view.seqname.starts_with("GL") {
                stats.skipped_contigs += 1;
                continue;
            }
            return Err(AnnotationError::UnknownChromosome {
                line: line_number,
                chrom: view.seqname.to_string(),
            });
        }

        if view.start >= view.end {
            return Err(AnnotationError::InvalidLine {
                line: line_number,
                message: format!("start ({}) must be less than end ({})", view.start, view.end),
            });
        }

        let attribute = |name: &'static str| {
            view.attribute(name)
                .ok_or_else(|| AnnotationError::MissingAttribute {
                    line: line_number,
                    attribute: name,
                })
        };
        let id = attribute("gene_id")?;
        let symbol = attribute("gene_name")?;
        let gene_type = attribute("gene_type")?;

        if !gene_set.allows(gene_type) {
            stats.filtered += 1;
            continue;
        }

        genes.push(GeneRecord::new(view.seqname, view.start, view.end, id, symbol));
        stats.kept += 1;
    }

    debug!("{:?}", stats);
    Ok((genes, stats))
}

/// Read all genes of a GENCODE GTF file (plain, .gz or .bz2)
pub fn read_gtf_file<P: AsRef<Path>>(path: P, gene_set: GeneSet) -> AnnotationResult<Vec<GeneRecord>> {
    let path = path.as_ref();
    let (genes, stats) = read_gtf_genes(open_annotation(path)?, gene_set)?;
    info!(
        "Read {} of {} genes from {:?} ({} filtered by type, {} on unplaced contigs)",
        stats.kept, stats.genes, path, stats.filtered, stats.skipped_contigs
    );
    Ok(genes)
}

//! Annotation format adapters
//!
//! Readers that produce gene records for the locator (GENCODE GTF, JSON gene lists).

pub mod gene_list;
pub mod gtf;

pub use gene_list::{read_gene_list, write_gene_list};
pub use gtf::{
    read_gtf_file, read_gtf_genes, GeneSet, GtfParseError, GtfRecordView, GtfStats,
    CODINGLIKE_GENETYPES,
};

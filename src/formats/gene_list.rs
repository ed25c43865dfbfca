//! JSON gene lists
//!
//! A gene list is a JSON array of flat `{chrom, start, end, ensg, symbol}`
//! records, gzip compressed when the path ends in `.gz`. It is the parsed
//! annotation in a form that is quick to reload.

use crate::core::{open_annotation, AnnotationResult, GeneRecord};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Read a gene list (plain or compressed)
pub fn read_gene_list<P: AsRef<Path>>(path: P) -> AnnotationResult<Vec<GeneRecord>> {
    let reader = open_annotation(path)?;
    Ok(serde_json::from_reader(reader)?)
}

/// Write a gene list, gzip compressed if the path ends in `.gz`
pub fn write_gene_list<P: AsRef<Path>>(path: P, genes: &[GeneRecord]) -> AnnotationResult<()> {
    let path = path.as_ref();
    let writer = BufWriter::with_capacity(128 * 1024, File::create(path)?);

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        serde_json::to_writer(&mut encoder, genes)?;
        encoder.finish()?.flush()?;
    } else {
        let mut writer = writer;
        serde_json::to_writer(&mut writer, genes)?;
        writer.flush()?;
    }
    Ok(())
}

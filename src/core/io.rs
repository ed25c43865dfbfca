//! Annotation file readers
//!
//! Opens plain, gzip or bzip2 annotation files behind one `BufRead`.
//! Large plain files are memory mapped.

use crate::core::error::{AnnotationError, AnnotationResult};
use log::debug;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Default buffer size for BufReader (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Threshold for memory mapping plain files (100MB)
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Compression format of an annotation file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

impl CompressionFormat {
    /// Detect from extension first, then from magic bytes
    ///
    /// gzip starts with `1f 8b`, bzip2 with `BZh`.
    pub fn detect(path: &Path) -> io::Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => return Ok(Self::Gzip),
            Some("bz2") => return Ok(Self::Bzip2),
            _ => {}
        }

        let mut magic = [0u8; 3];
        let bytes_read = File::open(path)?.read(&mut magic)?;
        Ok(Self::from_magic(&magic[..bytes_read]))
    }

    fn from_magic(magic: &[u8]) -> Self {
        if magic.starts_with(&[0x1f, 0x8b]) {
            Self::Gzip
        } else if magic.starts_with(b"BZh") {
            Self::Bzip2
        } else {
            Self::Plain
        }
    }
}

/// Read-only memory-mapped file exposed as `BufRead`
pub struct MappedReader {
    mmap: Mmap,
    position: usize,
}

impl MappedReader {
    pub fn new(file: &File) -> io::Result<Self> {
        // SAFETY: annotation files are not modified while being parsed
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap, position: 0 })
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

impl Read for MappedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.mmap[self.position..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        Ok(n)
    }
}

impl BufRead for MappedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&self.mmap[self.position..])
    }

    fn consume(&mut self, amt: usize) {
        self.position = (self.position + amt).min(self.mmap.len());
    }
}

/// Open an annotation file for line-oriented reading
///
/// Automatically handles gzip and bzip2 compression.
pub fn open_annotation<P: AsRef<Path>>(path: P) -> AnnotationResult<Box<dyn BufRead>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AnnotationError::FileNotFound(path.to_path_buf()));
    }

    let format = CompressionFormat::detect(path)?;
    let file = File::open(path)?;
    let file_size = file.metadata()?.len();
    debug!("Opening annotation {:?} ({:?}, {} bytes)", path, format, file_size);

    let reader: Box<dyn BufRead> = match format {
        CompressionFormat::Gzip => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            flate2::read::MultiGzDecoder::new(file),
        )),
        CompressionFormat::Bzip2 => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            bzip2::read::BzDecoder::new(file),
        )),
        CompressionFormat::Plain if file_size >= MMAP_THRESHOLD => {
            Box::new(MappedReader::new(&file)?)
        }
        CompressionFormat::Plain => Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)),
    };
    Ok(reader)
}

//! Whole-locator snapshots
//!
//! A snapshot is the bincode encoding of a built [`GeneLocator`]. On disk it
//! is gzip compressed. Restoring a snapshot skips annotation parsing and
//! reproduces the same partitions, store and query results.

use crate::core::error::{SnapshotError, SnapshotResult};
use crate::core::locator::GeneLocator;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

impl GeneLocator {
    /// Encode the whole locator as an opaque byte blob
    pub fn to_bytes(&self) -> SnapshotResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Restore a locator from [`GeneLocator::to_bytes`] output
    ///
    /// Blobs that decode but disagree with themselves are rejected as
    /// [`SnapshotError::Corrupt`].
    pub fn from_bytes(bytes: &[u8]) -> SnapshotResult<Self> {
        let locator: Self = bincode::deserialize(bytes)?;
        locator.check_consistency().map_err(SnapshotError::Corrupt)?;
        Ok(locator)
    }

    /// Write a gzip-compressed snapshot
    ///
    /// The file is written to a uniquely named temporary file next to its
    /// destination and renamed into place, so readers never see a partial
    /// snapshot. The temporary file is removed if writing fails.
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> SnapshotResult<()> {
        let path = path.as_ref();
        let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };

        let tmp = tempfile::Builder::new()
            .prefix(".snapshot-")
            .suffix(".partial")
            .tempfile_in(dir)?;
        {
            let mut encoder = GzEncoder::new(
                BufWriter::with_capacity(128 * 1024, tmp.as_file()),
                Compression::default(),
            );
            bincode::serialize_into(&mut encoder, self)?;
            encoder.finish()?.flush()?;
        }
        tmp.persist(path).map_err(|e| e.error)?;

        debug!("Saved snapshot of {} genes to {:?}", self.gene_count(), path);
        Ok(())
    }

    /// Read a snapshot written by [`GeneLocator::save_snapshot`]
    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> SnapshotResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SnapshotError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let decoder = GzDecoder::new(file);
        let locator: Self = bincode::deserialize_from(BufReader::with_capacity(128 * 1024, decoder))?;
        locator.check_consistency().map_err(SnapshotError::Corrupt)?;

        debug!("Loaded snapshot of {} genes from {:?}", locator.gene_count(), path);
        Ok(locator)
    }
}

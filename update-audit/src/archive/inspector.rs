//! Zip-backed [`ArchiveInspector`].

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use tracing::trace;
use zip::ZipArchive;

use super::{ArchiveError, ArchiveInspector, ArchiveResult, RawEntry};
use crate::checksum::{calculate_checksum, ChecksumKind};

/// Inspects zip archives stored under a common directory.
///
/// Manifest names are resolved relative to `archive_dir`.
#[derive(Debug, Clone)]
pub struct ZipInspector {
    archive_dir: PathBuf,
}

impl ZipInspector {
    /// Create an inspector for archives under `archive_dir`.
    pub fn new(archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            archive_dir: archive_dir.into(),
        }
    }

    /// Full path of a named archive.
    pub fn archive_path(&self, name: &str) -> PathBuf {
        self.archive_dir.join(name)
    }

    fn open(&self, name: &str) -> ArchiveResult<(PathBuf, File)> {
        let path = self.archive_path(name);
        let file = File::open(&path).map_err(|e| ArchiveError::ReadFailed {
            path: path.clone(),
            source: e,
        })?;
        Ok((path, file))
    }
}

impl ArchiveInspector for ZipInspector {
    fn archive_size(&self, name: &str) -> ArchiveResult<u64> {
        let path = self.archive_path(name);
        fs::metadata(&path)
            .map(|m| m.len())
            .map_err(|e| ArchiveError::ReadFailed { path, source: e })
    }

    fn list_entries(&self, name: &str) -> ArchiveResult<Vec<RawEntry>> {
        let (path, file) = self.open(name)?;
        let invalid = |e| ArchiveError::InvalidArchive {
            path: path.clone(),
            source: e,
        };

        let mut archive = ZipArchive::new(BufReader::new(file)).map_err(invalid)?;
        let mut entries = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            // Raw access reads the central directory record only, no inflation.
            let entry = archive.by_index_raw(i).map_err(invalid)?;
            entries.push(RawEntry {
                path: entry.name().to_string(),
                compressed_size: entry.compressed_size(),
                uncompressed_size: entry.size(),
                is_dir: entry.is_dir(),
            });
        }

        trace!(archive = name, entries = entries.len(), "Listed archive");
        Ok(entries)
    }

    fn checksum(&self, name: &str, kind: ChecksumKind) -> ArchiveResult<String> {
        let (path, file) = self.open(name)?;
        calculate_checksum(file, kind).map_err(|e| ArchiveError::ReadFailed { path, source: e })
    }
}

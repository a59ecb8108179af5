//! Archive inspection.
//!
//! The resolver never touches archive files itself. It consumes entry listings
//! produced by an [`ArchiveInspector`], which keeps the zip handling (and its
//! failure modes) in one place and lets tests feed listings directly.

mod inspector;

pub use inspector::ZipInspector;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::checksum::ChecksumKind;

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors raised while inspecting an archive.
///
/// These are never fatal for an audit: the affected archive is reported as
/// unreadable and the remaining archives are processed normally.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but is not a readable zip archive.
    #[error("invalid archive {}: {source}", path.display())]
    InvalidArchive {
        path: PathBuf,
        #[source]
        source: ::zip::result::ZipError,
    },
}

/// One entry as listed inside an archive, before ownership is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Entry name as stored in the archive.
    pub path: String,

    /// Bytes the entry occupies inside the archive.
    pub compressed_size: u64,

    /// Bytes the entry expands to.
    pub uncompressed_size: u64,

    /// Whether the entry denotes a directory.
    pub is_dir: bool,
}

impl RawEntry {
    /// Create a file entry.
    pub fn file(path: impl Into<String>, compressed_size: u64, uncompressed_size: u64) -> Self {
        Self {
            path: path.into(),
            compressed_size,
            uncompressed_size,
            is_dir: false,
        }
    }

    /// Create a directory entry. Directory entries carry no payload.
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            compressed_size: 0,
            uncompressed_size: 0,
            is_dir: true,
        }
    }
}

/// Source of archive sizes and entry listings.
pub trait ArchiveInspector {
    /// Size of the archive file itself, in bytes.
    fn archive_size(&self, name: &str) -> ArchiveResult<u64>;

    /// Enumerate the archive's entries in their stored order.
    ///
    /// The archive must be closed again before this returns, whether or not
    /// enumeration succeeded.
    fn list_entries(&self, name: &str) -> ArchiveResult<Vec<RawEntry>>;

    /// Compute the checksum of the archive file with the given algorithm,
    /// as lowercase hex.
    fn checksum(&self, name: &str, kind: ChecksumKind) -> ArchiveResult<String>;
}

//! Update manifest parsing.
//!
//! The update server keeps a plain-text manifest listing every archive it has
//! ever shipped, oldest first, one per line:
//!
//! ```text
//! update-1.zip 4a1c03e2
//! update-2.zip 9f00d113
//! ```
//!
//! Ownership resolution needs the opposite order, so [`Manifest::resolution_order`]
//! is the only way the audit pipeline walks the entries.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Errors that can occur while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A non-blank line did not split into `<archive> <checksum>`.
    #[error("malformed manifest line {line}: {content:?}")]
    Malformed { line: usize, content: String },
}

/// One archive as declared by the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Archive path, relative to the archive directory.
    pub name: String,

    /// Checksum string as published; opaque to the resolver.
    pub checksum: String,
}

impl ManifestEntry {
    /// Create a new manifest entry.
    pub fn new(name: impl Into<String>, checksum: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checksum: checksum.into(),
        }
    }
}

/// Ordered list of archives, oldest first as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> ManifestResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ManifestError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse manifest text.
    ///
    /// Blank lines are skipped. Any other line must contain an archive name and
    /// a checksum separated by a single space.
    pub fn parse(content: &str) -> ManifestResult<Self> {
        let mut entries = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let malformed = || ManifestError::Malformed {
                line: idx + 1,
                content: raw.to_string(),
            };

            let (name, checksum) = line.split_once(' ').ok_or_else(malformed)?;
            let checksum = checksum.trim();
            if name.is_empty() || checksum.is_empty() || checksum.contains(char::is_whitespace) {
                return Err(malformed());
            }

            entries.push(ManifestEntry::new(name, checksum));
        }

        Ok(Self { entries })
    }

    /// Entries in manifest (oldest-first) order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Entries newest-first, the order ownership resolution requires.
    pub fn resolution_order(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter().rev()
    }

    /// Number of archives listed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the manifest lists no archives.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Records produced by ownership resolution.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::archive::RawEntry;
use crate::checksum::ChecksumStatus;

/// One path inside one archive, with its resolved ownership and liveness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRecord {
    /// Entry name; directories conventionally end with `/`.
    pub path: String,

    /// Bytes this entry occupies in the archive.
    pub compressed_size: u64,

    /// Bytes this entry expands to.
    pub uncompressed_size: u64,

    /// Whether the entry denotes a directory.
    pub is_dir: bool,

    /// Whether this archive is the newest one listing the path.
    pub is_owner: bool,

    /// Whether a live copy of the path currently exists.
    pub is_live: bool,
}

impl EntryRecord {
    pub(crate) fn from_raw(raw: RawEntry, is_owner: bool, is_live: bool) -> Self {
        Self {
            is_dir: raw.is_dir || raw.path.ends_with('/'),
            path: raw.path,
            compressed_size: raw.compressed_size,
            uncompressed_size: raw.uncompressed_size,
            is_owner,
            is_live,
        }
    }

    /// Owned by this archive and still live.
    pub fn is_used(&self) -> bool {
        self.is_owner && self.is_live
    }

    /// No live copy exists anymore.
    pub fn is_obsolete(&self) -> bool {
        !self.is_live
    }

    /// Whether a report may offer this entry for download.
    pub fn is_downloadable(&self) -> bool {
        self.is_live && !self.is_dir
    }
}

/// One archive after resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveRecord {
    /// Archive name as listed in the manifest.
    pub name: String,

    /// Checksum as listed in the manifest.
    pub declared_checksum: String,

    /// Size of the archive file on disk.
    pub archive_size: u64,

    /// Sum of uncompressed entry sizes.
    pub uncompressed_total: u64,

    /// Sum of compressed entry sizes (the archive's declared payload).
    pub compressed_total: u64,

    /// Compressed bytes of entries that are owned here and live.
    pub used_bytes: u64,

    /// Number of entries that are owned here and live.
    pub used_entries: usize,

    /// Entries keyed by path.
    pub entries: BTreeMap<String, EntryRecord>,

    /// Why the archive could not be enumerated, if it could not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_error: Option<String>,

    /// Verification outcome, present only when verification ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum_status: Option<ChecksumStatus>,
}

impl ArchiveRecord {
    pub(crate) fn new(name: String, declared_checksum: String, archive_size: u64) -> Self {
        Self {
            name,
            declared_checksum,
            archive_size,
            uncompressed_total: 0,
            compressed_total: 0,
            used_bytes: 0,
            used_entries: 0,
            entries: BTreeMap::new(),
            read_error: None,
            checksum_status: None,
        }
    }

    /// Check if the archive could not be enumerated.
    pub fn is_unreadable(&self) -> bool {
        self.read_error.is_some()
    }

    /// Percentage of the compressed payload that is still used.
    ///
    /// `None` when it is not meaningful: the archive is unreadable or lists no
    /// entries. An archive whose entries carry no bytes reports 0%.
    pub fn used_percentage(&self) -> Option<f64> {
        if self.is_unreadable() || self.entries.is_empty() {
            return None;
        }
        Some(percentage(self.used_bytes, self.compressed_total))
    }

    /// Container overhead: file size beyond the entries' compressed payload.
    pub fn overhead(&self) -> u64 {
        self.archive_size.saturating_sub(self.compressed_total)
    }

    /// Number of entries recorded for this archive.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// Path → owning archive, across every archive resolved so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OwnerIndex {
    owners: BTreeMap<String, String>,
}

impl OwnerIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `path` for `archive` unless someone already owns it.
    ///
    /// Returns `true` if the claim succeeded.
    pub fn claim(&mut self, path: &str, archive: &str) -> bool {
        if self.owners.contains_key(path) {
            return false;
        }
        self.owners.insert(path.to_string(), archive.to_string());
        true
    }

    /// Name of the archive owning `path`.
    pub fn owner_of(&self, path: &str) -> Option<&str> {
        self.owners.get(path).map(String::as_str)
    }

    /// Check if `path` has an owner.
    pub fn contains(&self, path: &str) -> bool {
        self.owners.contains_key(path)
    }

    /// Iterate over `(path, owner)` pairs, sorted by path.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.owners.iter().map(|(p, a)| (p.as_str(), a.as_str()))
    }

    /// Number of distinct paths.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Check if no path has been claimed.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// `part / whole` as a percentage, 0 when `whole` is 0.
pub(crate) fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

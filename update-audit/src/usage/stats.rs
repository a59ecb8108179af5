//! Global statistics over resolved archives.

use serde::Serialize;

use super::types::{percentage, ArchiveRecord};

/// Totals across every archive of a resolution.
///
/// Unreadable archives only contribute their raw file size (to
/// `total_archive_size` and `total_overhead`); every other sum skips them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GlobalStatistics {
    /// Number of archives in the manifest.
    pub archive_count: usize,

    /// Archives that could not be enumerated.
    pub unreadable_count: usize,

    /// Entries across readable archives.
    pub total_entries: usize,

    /// Entries that are owned by their archive and live.
    pub used_entries: usize,

    /// Raw size of all archive files.
    pub total_archive_size: u64,

    /// Sum of compressed entry sizes.
    pub total_declared: u64,

    /// Sum of uncompressed entry sizes.
    pub total_uncompressed: u64,

    /// Compressed bytes still in use.
    pub total_used: u64,

    /// Container overhead: archive file bytes beyond the entry payloads.
    pub total_overhead: u64,

    /// Compressed bytes no longer in use.
    pub obsoleted_size: u64,
}

impl GlobalStatistics {
    /// Aggregate the given archive records.
    pub fn from_archives(archives: &[ArchiveRecord]) -> Self {
        let mut stats = Self {
            archive_count: archives.len(),
            ..Default::default()
        };

        for archive in archives {
            stats.total_archive_size += archive.archive_size;
            stats.total_overhead += archive.overhead();

            if archive.is_unreadable() {
                stats.unreadable_count += 1;
                continue;
            }

            stats.total_entries += archive.entry_count();
            stats.used_entries += archive.used_entries;
            stats.total_declared += archive.compressed_total;
            stats.total_uncompressed += archive.uncompressed_total;
            stats.total_used += archive.used_bytes;
        }

        stats.obsoleted_size = stats.total_declared - stats.total_used;
        stats
    }

    /// Share of the declared payload that is obsolete, 0 when nothing is declared.
    pub fn obsoleted_percentage(&self) -> f64 {
        percentage(self.obsoleted_size, self.total_declared)
    }

    /// Share of the declared payload still in use, 0 when nothing is declared.
    pub fn used_percentage(&self) -> f64 {
        percentage(self.total_used, self.total_declared)
    }
}

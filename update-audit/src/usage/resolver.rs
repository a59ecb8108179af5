//! Ownership resolution across update archives.

use std::collections::btree_map::Entry;

use tracing::debug;

use super::stats::GlobalStatistics;
use super::types::{ArchiveRecord, EntryRecord, OwnerIndex};
use crate::archive::RawEntry;
use crate::checksum::ChecksumStatus;
use crate::probe::LiveProbe;

/// An archive waiting to be resolved.
#[derive(Debug, Clone)]
pub struct PendingArchive {
    /// Archive name as listed in the manifest.
    pub name: String,

    /// Checksum as listed in the manifest.
    pub declared_checksum: String,

    /// Size of the archive file on disk.
    pub archive_size: u64,

    /// Entries in stored order, or the reason they could not be listed.
    pub listing: Result<Vec<RawEntry>, String>,

    /// Verification outcome, when verification ran.
    pub checksum_status: Option<ChecksumStatus>,
}

impl PendingArchive {
    /// Create a pending archive with a successful listing.
    pub fn new(
        name: impl Into<String>,
        declared_checksum: impl Into<String>,
        archive_size: u64,
        entries: Vec<RawEntry>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_checksum: declared_checksum.into(),
            archive_size,
            listing: Ok(entries),
            checksum_status: None,
        }
    }

    /// Create a pending archive whose entries could not be listed.
    pub fn unreadable(
        name: impl Into<String>,
        declared_checksum: impl Into<String>,
        archive_size: u64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_checksum: declared_checksum.into(),
            archive_size,
            listing: Err(reason.into()),
            checksum_status: None,
        }
    }

    /// Attach a checksum verification outcome.
    pub fn with_checksum_status(mut self, status: ChecksumStatus) -> Self {
        self.checksum_status = Some(status);
        self
    }
}

/// Outcome of resolving a full archive sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Archives in resolution (newest-first) order.
    archives: Vec<ArchiveRecord>,

    /// Owner of every distinct path.
    index: OwnerIndex,
}

impl Resolution {
    /// Archives newest first, as they were resolved.
    pub fn archives(&self) -> &[ArchiveRecord] {
        &self.archives
    }

    /// Archives oldest first, the order reports present them in.
    pub fn display_order(&self) -> impl Iterator<Item = &ArchiveRecord> {
        self.archives.iter().rev()
    }

    /// The global owner index.
    pub fn index(&self) -> &OwnerIndex {
        &self.index
    }

    /// Look up an archive by name.
    pub fn archive(&self, name: &str) -> Option<&ArchiveRecord> {
        self.archives.iter().find(|a| a.name == name)
    }

    /// Name of the archive owning `path`.
    pub fn owner_of(&self, path: &str) -> Option<&str> {
        self.index.owner_of(path)
    }

    /// Aggregate statistics over all archives.
    pub fn statistics(&self) -> GlobalStatistics {
        GlobalStatistics::from_archives(&self.archives)
    }
}

/// Assigns every shipped path to the newest archive listing it.
///
/// Ownership is "first occurrence wins", so archives **must** be supplied
/// newest first. Feeding them in any other order still produces a result, but
/// paths shared between archives end up owned by the wrong (older) archive.
pub struct OwnershipResolver<'a, P: LiveProbe + ?Sized> {
    probe: &'a P,
}

impl<'a, P: LiveProbe + ?Sized> OwnershipResolver<'a, P> {
    /// Create a resolver checking liveness with `probe`.
    pub fn new(probe: &'a P) -> Self {
        Self { probe }
    }

    /// Resolve archives given newest first.
    pub fn resolve<I>(&self, archives: I) -> Resolution
    where
        I: IntoIterator<Item = PendingArchive>,
    {
        let (archives, index) = archives.into_iter().fold(
            (Vec::new(), OwnerIndex::new()),
            |(mut records, index), pending| {
                let (record, index) = self.resolve_archive(pending, index);
                records.push(record);
                (records, index)
            },
        );

        Resolution { archives, index }
    }

    /// Resolve one archive against the index built from all newer archives.
    ///
    /// Returns the finished record and the index extended with every path this
    /// archive introduced.
    pub fn resolve_archive(
        &self,
        pending: PendingArchive,
        mut index: OwnerIndex,
    ) -> (ArchiveRecord, OwnerIndex) {
        let mut record = ArchiveRecord::new(
            pending.name,
            pending.declared_checksum,
            pending.archive_size,
        );
        record.checksum_status = pending.checksum_status;

        let entries = match pending.listing {
            Ok(entries) => entries,
            Err(reason) => {
                record.read_error = Some(reason);
                return (record, index);
            }
        };

        for raw in entries {
            let is_live = self.probe.is_live(&raw.path);
            // Claimed even when not live: the newest lister owns the path regardless.
            let is_owner = index.claim(&raw.path, &record.name);

            if is_owner && is_live {
                record.used_entries += 1;
                record.used_bytes += raw.compressed_size;
            }
            record.compressed_total += raw.compressed_size;
            record.uncompressed_total += raw.uncompressed_size;

            // Duplicate names within one archive keep the first listing.
            if let Entry::Vacant(slot) = record.entries.entry(raw.path.clone()) {
                slot.insert(EntryRecord::from_raw(raw, is_owner, is_live));
            }
        }

        debug!(
            archive = %record.name,
            entries = record.entries.len(),
            used_entries = record.used_entries,
            used_bytes = record.used_bytes,
            compressed_total = record.compressed_total,
            "Resolved archive"
        );

        (record, index)
    }
}

//! End-to-end audit of a manifest's archives.

use tracing::{debug, info, warn};

use crate::archive::ArchiveInspector;
use crate::checksum::{ChecksumKind, ChecksumStatus};
use crate::manifest::{Manifest, ManifestEntry};
use crate::probe::LiveProbe;
use crate::usage::{OwnershipResolver, PendingArchive, Resolution};

/// Runs inspection and ownership resolution over every archive in a manifest.
///
/// Archive problems never abort the run. An archive that cannot be stat'ed or
/// enumerated is resolved as unreadable and the audit moves on.
pub struct UpdateAudit<'a> {
    inspector: &'a dyn ArchiveInspector,
    probe: &'a dyn LiveProbe,
    verify_checksums: bool,
}

impl<'a> UpdateAudit<'a> {
    /// Create an audit reading archives through `inspector` and checking
    /// liveness through `probe`.
    pub fn new(inspector: &'a dyn ArchiveInspector, probe: &'a dyn LiveProbe) -> Self {
        Self {
            inspector,
            probe,
            verify_checksums: false,
        }
    }

    /// Enable or disable checksum verification (off by default).
    pub fn with_checksum_verification(mut self, enabled: bool) -> Self {
        self.verify_checksums = enabled;
        self
    }

    /// Audit every archive listed in `manifest`.
    pub fn run(&self, manifest: &Manifest) -> Resolution {
        let pending = manifest
            .resolution_order()
            .map(|entry| self.inspect(entry));

        let resolution = OwnershipResolver::new(self.probe).resolve(pending);

        let stats = resolution.statistics();
        info!(
            archives = stats.archive_count,
            unreadable = stats.unreadable_count,
            entries = stats.total_entries,
            used_entries = stats.used_entries,
            obsoleted_bytes = stats.obsoleted_size,
            "Audit complete"
        );

        resolution
    }

    fn inspect(&self, entry: &ManifestEntry) -> PendingArchive {
        let name = entry.name.as_str();

        let archive_size = self.inspector.archive_size(name).unwrap_or_else(|e| {
            warn!(archive = name, error = %e, "Cannot stat archive");
            0
        });

        let mut pending = match self.inspector.list_entries(name) {
            Ok(entries) => {
                debug!(archive = name, entries = entries.len(), "Listed archive");
                PendingArchive::new(name, &entry.checksum, archive_size, entries)
            }
            Err(e) => {
                warn!(archive = name, error = %e, "Archive unreadable");
                PendingArchive::unreadable(name, &entry.checksum, archive_size, e.to_string())
            }
        };

        if self.verify_checksums {
            pending = pending.with_checksum_status(self.verify(entry));
        }

        pending
    }

    fn verify(&self, entry: &ManifestEntry) -> ChecksumStatus {
        let Some(kind) = ChecksumKind::detect(&entry.checksum) else {
            debug!(
                archive = %entry.name,
                checksum = %entry.checksum,
                "Checksum format not recognised"
            );
            return ChecksumStatus::Unsupported;
        };

        let status = match self.inspector.checksum(&entry.name, kind) {
            Ok(actual) => ChecksumStatus::compare(&entry.checksum, actual),
            Err(e) => ChecksumStatus::Failed {
                reason: e.to_string(),
            },
        };

        if status.is_problem() {
            warn!(
                archive = %entry.name,
                declared = %entry.checksum,
                ?status,
                "Checksum verification failed"
            );
        }
        status
    }
}

//! update-audit - Usage analysis for incremental update archives
//!
//! Game clients are patched by a growing series of zip "update" archives. Every
//! new archive may ship files that supersede files from older ones, so older
//! archives slowly fill up with content nobody downloads anymore. This library
//! works out, for every path ever shipped, which archive owns it today and how
//! much of each archive is still in use.
//!
//! # Architecture
//!
//! ```text
//! Manifest ──► ArchiveInspector ──► OwnershipResolver ──► Report
//! (oldest      (entries + sizes     (fold, newest        (text / html /
//!  first)       per archive)         first)               json)
//!                                       ▲
//!                                   LiveProbe
//!                             (checked-out files)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use update_audit::archive::ZipInspector;
//! use update_audit::audit::UpdateAudit;
//! use update_audit::manifest::Manifest;
//! use update_audit::probe::CheckoutProbe;
//! use update_audit::report::{render, ReportContext, ReportFormat};
//!
//! let manifest = Manifest::load("/srv/updates/resources2.txt".as_ref())?;
//! let inspector = ZipInspector::new("/srv/updates");
//! let probe = CheckoutProbe::new("/srv/checkout");
//!
//! let resolution = UpdateAudit::new(&inspector, &probe).run(&manifest);
//! let context = ReportContext::new("https://updates.example.org/checkout/");
//! println!("{}", render(&resolution, ReportFormat::Text, &context)?);
//! ```

pub mod archive;
pub mod audit;
pub mod checksum;
pub mod config;
pub mod error;
pub mod manifest;
pub mod probe;
pub mod report;
pub mod usage;

pub use audit::UpdateAudit;
pub use error::{AuditError, AuditResult};
pub use usage::{
    ArchiveRecord, EntryRecord, GlobalStatistics, OwnerIndex, OwnershipResolver, PendingArchive,
    Resolution,
};

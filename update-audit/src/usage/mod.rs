//! Ownership resolution and usage statistics.
//!
//! This is the heart of the audit. Archives are walked newest to oldest; the
//! first archive listing a path becomes its owner, and an entry counts as
//! "used" only while its owner is this archive and its live copy still exists.
//!
//! # Overview
//!
//! ```text
//! newest ─► update-3.zip   data/items.xml (owner, live)     used
//!           update-2.zip   data/items.xml (shadowed)        superseded
//!                          data/old.png   (owner, missing)  obsolete
//! oldest ─► update-1.zip   ...
//! ```
//!
//! The [`OwnerIndex`] is the only state carried from one archive to the next.
//! It is threaded through [`OwnershipResolver::resolve`] as a fold accumulator
//! and handed back inside the [`Resolution`].

mod resolver;
mod stats;
mod types;


pub use resolver::{OwnershipResolver, PendingArchive, Resolution};
pub use stats::GlobalStatistics;
pub use types::{ArchiveRecord, EntryRecord, OwnerIndex};

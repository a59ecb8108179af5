//! Live checkout probing.
//!
//! An entry is "live" while a checked-out copy of it exists. Entries that are
//! gone from the checkout are obsolete: some later update removed or replaced
//! them and nobody needs the archived bytes anymore.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use tracing::warn;

/// Answers whether an entry path currently has a live copy.
pub trait LiveProbe {
    /// Check if `entry_path` exists in the live checkout.
    fn is_live(&self, entry_path: &str) -> bool;
}

/// Probe backed by a checked-out directory tree.
#[derive(Debug, Clone)]
pub struct CheckoutProbe {
    root: PathBuf,
}

impl CheckoutProbe {
    /// Create a probe rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Where the live copy of `entry_path` would be.
    ///
    /// `None` when the name would leave the checkout root through a `..`
    /// component.
    pub fn live_path(&self, entry_path: &str) -> Option<PathBuf> {
        // Entry names are archive-relative; a leading slash would replace the root.
        let relative = Path::new(entry_path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl LiveProbe for CheckoutProbe {
    fn is_live(&self, entry_path: &str) -> bool {
        let Some(path) = self.live_path(entry_path) else {
            warn!(entry = entry_path, "Entry escapes the checkout root, treating as not live");
            return false;
        };

        match path.try_exists() {
            Ok(exists) => exists,
            Err(e) => {
                warn!(
                    entry = entry_path,
                    path = %path.display(),
                    error = %e,
                    "Cannot probe live copy"
                );
                false
            }
        }
    }
}

/// Probe over a fixed set of live paths.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    live: HashSet<String>,
}

impl StaticProbe {
    /// Create a probe reporting exactly `paths` as live.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            live: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl LiveProbe for StaticProbe {
    fn is_live(&self, entry_path: &str) -> bool {
        self.live.contains(entry_path)
    }
}

//! Top-level error type for library callers.
//!
//! Only failures that stop a whole audit end up here. Per-archive problems are
//! recorded on the archive's record and rendered inline instead.

use thiserror::Error;

use crate::manifest::ManifestError;

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

/// Errors that abort an audit run.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The manifest could not be read or contains a malformed line.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

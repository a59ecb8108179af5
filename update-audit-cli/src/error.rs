//! CLI error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use update_audit::config::ConfigError;
use update_audit::report::ReportError;
use update_audit::AuditError;

/// Errors that end a CLI invocation with a non-zero exit status.
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing or contradictory settings.
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Report(#[from] ReportError),

    /// The report could not be written.
    #[error("failed to write report to {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

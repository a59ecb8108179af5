//! Report rendering.
//!
//! A report has four sections, always in this order:
//!
//! 1. per-archive summary (oldest to newest)
//! 2. global totals
//! 3. the owner index, one line per distinct path
//! 4. per-archive entry listings (oldest to newest)
//!
//! Each [`ReportFormat`] renders the same content; only the markup differs.

mod html;
mod json;
mod text;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::usage::{EntryRecord, Resolution};

/// Result type for report rendering.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur while rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// JSON serialization failed.
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Plain text for terminals and logs.
    #[default]
    Text,
    /// Standalone HTML page with download links.
    Html,
    /// Machine-readable JSON.
    Json,
}

impl ReportFormat {
    /// Name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format '{}'", other)),
        }
    }
}

/// Settings that shape a report but are not part of the resolution.
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    /// Prefix joined with an entry path to form its download location.
    pub download_base_url: String,

    /// Timestamp shown in the report header.
    pub generated_at: Option<DateTime<Local>>,
}

impl ReportContext {
    /// Create a context with the given download base URL.
    pub fn new(download_base_url: impl Into<String>) -> Self {
        Self {
            download_base_url: download_base_url.into(),
            generated_at: None,
        }
    }

    /// Stamp the report with a generation time.
    pub fn with_generated_at(mut self, at: DateTime<Local>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Download location for an entry path.
    pub fn download_url(&self, entry_path: &str) -> String {
        format!("{}{}", self.download_base_url, entry_path)
    }

    fn generated_label(&self) -> Option<String> {
        self.generated_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

/// Render a resolution in the requested format.
pub fn render(
    resolution: &Resolution,
    format: ReportFormat,
    context: &ReportContext,
) -> ReportResult<String> {
    match format {
        ReportFormat::Text => Ok(text::render(resolution, context)),
        ReportFormat::Html => Ok(html::render(resolution, context)),
        ReportFormat::Json => json::render(resolution, context),
    }
}

/// How an entry is annotated in a per-archive listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryMark<'a> {
    /// Owned by the listed archive and live.
    Used,
    /// No live copy exists.
    Obsolete,
    /// Live, but served from a newer archive.
    OwnedBy(&'a str),
}

fn entry_mark<'a>(resolution: &'a Resolution, entry: &EntryRecord) -> EntryMark<'a> {
    if entry.is_obsolete() {
        EntryMark::Obsolete
    } else if entry.is_owner {
        EntryMark::Used
    } else {
        // Every listed path was claimed by some archive during resolution.
        EntryMark::OwnedBy(resolution.owner_of(&entry.path).unwrap_or("?"))
    }
}

/// Format a byte count in kilobytes with one decimal.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Format an optional percentage, `n/a` when absent.
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(p) => format!("{:.1}%", p),
        None => "n/a".to_string(),
    }
}

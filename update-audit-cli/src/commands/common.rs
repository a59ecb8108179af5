//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;

use clap::ValueEnum;
use update_audit::config::ReportSettings;
use update_audit::report::ReportFormat;

use crate::error::CliError;

/// Report format selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// Plain text
    Text,
    /// Standalone HTML page with download links
    Html,
    /// Machine-readable JSON
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Html => ReportFormat::Html,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

/// Report settings after merging CLI arguments over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub manifest: PathBuf,
    pub archive_dir: PathBuf,
    pub live_root: PathBuf,
    pub download_base_url: String,
    pub format: ReportFormat,
    pub verify_checksums: bool,
}

impl ResolvedSettings {
    /// Check that every required setting is present.
    pub fn from_settings(settings: ReportSettings) -> Result<Self, CliError> {
        let archive_dir = settings.effective_archive_dir();

        let manifest = settings.manifest.ok_or_else(|| {
            CliError::Config(
                "No manifest given. Use --manifest or set report.manifest in config.ini"
                    .to_string(),
            )
        })?;
        let live_root = settings.live_root.ok_or_else(|| {
            CliError::Config(
                "No live checkout given. Use --live-root or set report.live_root in config.ini"
                    .to_string(),
            )
        })?;

        Ok(Self {
            // A bare file name has an empty parent; archives then sit in the working directory.
            archive_dir: archive_dir.unwrap_or_default(),
            manifest,
            live_root,
            download_base_url: settings.download_base_url.unwrap_or_default(),
            format: settings.format,
            verify_checksums: settings.verify_checksums,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ReportSettings {
        ReportSettings {
            manifest: Some(PathBuf::from("/srv/updates/resources2.txt")),
            live_root: Some(PathBuf::from("/srv/checkout")),
            ..Default::default()
        }
    }

    #[test]
    fn test_archive_dir_defaults_to_manifest_dir() {
        let resolved = ResolvedSettings::from_settings(settings()).unwrap();
        assert_eq!(resolved.archive_dir, PathBuf::from("/srv/updates"));
        assert_eq!(resolved.download_base_url, "");
        assert_eq!(resolved.format, ReportFormat::Text);
    }

    #[test]
    fn test_missing_live_root_is_an_error() {
        let mut settings = settings();
        settings.live_root = None;

        let err = ResolvedSettings::from_settings(settings).unwrap_err();
        assert!(err.to_string().contains("--live-root"));
    }

    #[test]
    fn test_missing_manifest_is_an_error() {
        let mut settings = settings();
        settings.manifest = None;

        let err = ResolvedSettings::from_settings(settings).unwrap_err();
        assert!(err.to_string().contains("--manifest"));
    }

    #[test]
    fn test_format_arg_conversion() {
        assert_eq!(ReportFormat::from(FormatArg::Html), ReportFormat::Html);
    }
}

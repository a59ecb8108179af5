//! The `report` command: audit a manifest and write the usage report.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::Args;
use tracing::{info, warn};
use update_audit::archive::ZipInspector;
use update_audit::config::ConfigFile;
use update_audit::manifest::Manifest;
use update_audit::probe::CheckoutProbe;
use update_audit::report::{render, ReportContext};
use update_audit::{AuditError, UpdateAudit};

use super::common::{FormatArg, ResolvedSettings};
use crate::error::CliError;

/// Arguments of the `report` command.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Manifest listing the archives, oldest first
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Directory holding the archives (defaults to the manifest's directory)
    #[arg(long, value_name = "PATH")]
    pub archive_dir: Option<PathBuf>,

    /// Root of the live checkout
    #[arg(long, value_name = "PATH")]
    pub live_root: Option<PathBuf>,

    /// Prefix for download links
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Verify archive checksums against the manifest
    #[arg(long)]
    pub verify_checksums: bool,
}

/// Run the report command.
pub fn run(args: ReportArgs, config_path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(config_path)?;
    let output = args.output.clone();
    let settings = resolve_settings(args, config)?;

    if settings.download_base_url.is_empty() {
        warn!("No download base URL configured, links will be bare entry paths");
    }

    let manifest = Manifest::load(&settings.manifest).map_err(AuditError::from)?;
    info!(
        manifest = %settings.manifest.display(),
        archives = manifest.len(),
        "Loaded manifest"
    );

    let inspector = ZipInspector::new(&settings.archive_dir);
    let probe = CheckoutProbe::new(&settings.live_root);
    let resolution = UpdateAudit::new(&inspector, &probe)
        .with_checksum_verification(settings.verify_checksums)
        .run(&manifest);

    let context =
        ReportContext::new(settings.download_base_url).with_generated_at(Local::now());
    let report = render(&resolution, settings.format, &context)?;

    match output {
        Some(path) => {
            fs::write(&path, report).map_err(|e| CliError::WriteFailed {
                path: path.clone(),
                source: e,
            })?;
            info!(path = %path.display(), "Report written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(report.as_bytes())
                .map_err(|e| CliError::WriteFailed {
                    path: PathBuf::from("<stdout>"),
                    source: e,
                })?;
        }
    }

    Ok(())
}

/// Merge CLI arguments over the config file's `[report]` section.
fn resolve_settings(args: ReportArgs, config: ConfigFile) -> Result<ResolvedSettings, CliError> {
    let mut settings = config.report;

    // CLI takes precedence, then config
    settings.manifest = args.manifest.or(settings.manifest);
    settings.archive_dir = args.archive_dir.or(settings.archive_dir);
    settings.live_root = args.live_root.or(settings.live_root);
    settings.download_base_url = args.base_url.or(settings.download_base_url);
    if let Some(format) = args.format {
        settings.format = format.into();
    }
    settings.verify_checksums |= args.verify_checksums;

    ResolvedSettings::from_settings(settings)
}

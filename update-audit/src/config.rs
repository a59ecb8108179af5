//! Configuration file handling.
//!
//! Settings live in an INI file, by default `<config dir>/update-audit/config.ini`:
//!
//! ```ini
//! [report]
//! manifest = /srv/updates/resources2.txt
//! archive_dir = /srv/updates
//! live_root = /srv/checkout
//! download_base_url = https://updates.example.org/checkout/
//! format = html
//! verify_checksums = false
//! ```
//!
//! Every key is optional. Command-line arguments take precedence over the file.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::report::ReportFormat;

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "update-audit";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

const REPORT_SECTION: &str = "report";

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or parsed.
    #[error("failed to read config {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// The file could not be written.
    #[error("failed to write config {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The key is not a known `section.key` name.
    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    /// The value is not valid for the key.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Path of the default configuration file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

/// Settings of the `[report]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSettings {
    /// Manifest listing the archives, oldest first.
    pub manifest: Option<PathBuf>,

    /// Directory manifest names are relative to. Defaults to the manifest's directory.
    pub archive_dir: Option<PathBuf>,

    /// Root of the live checkout probed for each entry.
    pub live_root: Option<PathBuf>,

    /// Prefix for download links.
    pub download_base_url: Option<String>,

    /// Output format.
    pub format: ReportFormat,

    /// Whether to verify archive checksums.
    pub verify_checksums: bool,
}

impl ReportSettings {
    /// Archive directory, falling back to the manifest's parent directory.
    pub fn effective_archive_dir(&self) -> Option<PathBuf> {
        self.archive_dir.clone().or_else(|| {
            self.manifest
                .as_deref()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
        })
    }
}

/// The parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// `[report]` section.
    pub report: ReportSettings,
}

impl ConfigFile {
    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config = Self::default();
        if let Some(section) = ini.section(Some(REPORT_SECTION)) {
            for key in ConfigKey::all() {
                if let Some(value) = section.get(key.name()) {
                    key.set(&mut config, value)?;
                }
            }
        }

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let write_failed = |e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(REPORT_SECTION))
                    .set(key.name(), value);
            }
        }

        ini.write_to_file(path).map_err(write_failed)
    }
}

/// A settable configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Manifest,
    ArchiveDir,
    LiveRoot,
    DownloadBaseUrl,
    Format,
    VerifyChecksums,
}

impl ConfigKey {
    /// All keys, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            Self::Manifest,
            Self::ArchiveDir,
            Self::LiveRoot,
            Self::DownloadBaseUrl,
            Self::Format,
            Self::VerifyChecksums,
        ]
    }

    /// Key name within the `[report]` section.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Manifest => "manifest",
            Self::ArchiveDir => "archive_dir",
            Self::LiveRoot => "live_root",
            Self::DownloadBaseUrl => "download_base_url",
            Self::Format => "format",
            Self::VerifyChecksums => "verify_checksums",
        }
    }

    /// Current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        let report = &config.report;
        let path = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        match self {
            Self::Manifest => path(&report.manifest),
            Self::ArchiveDir => path(&report.archive_dir),
            Self::LiveRoot => path(&report.live_root),
            Self::DownloadBaseUrl => report.download_base_url.clone().unwrap_or_default(),
            Self::Format => report.format.to_string(),
            Self::VerifyChecksums => report.verify_checksums.to_string(),
        }
    }

    /// Validate and store a value. An empty value clears optional keys.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> ConfigResult<()> {
        let report = &mut config.report;
        let value = value.trim();
        let optional_path = |v: &str| (!v.is_empty()).then(|| PathBuf::from(v));

        match self {
            Self::Manifest => report.manifest = optional_path(value),
            Self::ArchiveDir => report.archive_dir = optional_path(value),
            Self::LiveRoot => report.live_root = optional_path(value),
            Self::DownloadBaseUrl => {
                report.download_base_url = (!value.is_empty()).then(|| value.to_string())
            }
            Self::Format => {
                report.format = value.parse().map_err(|reason| self.invalid(value, reason))?
            }
            Self::VerifyChecksums => {
                report.verify_checksums = parse_bool(value)
                    .ok_or_else(|| self.invalid(value, "expected true or false".to_string()))?
            }
        }
        Ok(())
    }

    fn invalid(&self, value: &str, reason: String) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.to_string(),
            value: value.to_string(),
            reason,
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", REPORT_SECTION, self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|key| key.to_string() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("config.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.report.format, ReportFormat::Text);
    }

    #[test]
    fn test_load_report_section() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(
            &path,
            "[report]\n\
             manifest = /srv/updates/resources2.txt\n\
             live_root = /srv/checkout\n\
             download_base_url = https://updates.example.org/checkout/\n\
             format = html\n\
             verify_checksums = yes\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        let report = &config.report;
        assert_eq!(report.manifest, Some(PathBuf::from("/srv/updates/resources2.txt")));
        assert_eq!(report.live_root, Some(PathBuf::from("/srv/checkout")));
        assert_eq!(
            report.download_base_url.as_deref(),
            Some("https://updates.example.org/checkout/")
        );
        assert_eq!(report.format, ReportFormat::Html);
        assert!(report.verify_checksums);
        assert_eq!(report.effective_archive_dir(), Some(PathBuf::from("/srv/updates")));
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[report]\nformat = pdf\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("report.format"));
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        ConfigKey::LiveRoot.set(&mut config, "/srv/checkout").unwrap();
        ConfigKey::Format.set(&mut config, "json").unwrap();
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_key_parse_and_display() {
        let key: ConfigKey = "report.download_base_url".parse().unwrap();
        assert_eq!(key, ConfigKey::DownloadBaseUrl);
        assert_eq!(key.to_string(), "report.download_base_url");
        assert!(matches!(
            "report.nope".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_empty_value_clears_optional_key() {
        let mut config = ConfigFile::default();
        ConfigKey::Manifest.set(&mut config, "/srv/a.txt").unwrap();
        ConfigKey::Manifest.set(&mut config, "").unwrap();
        assert_eq!(config.report.manifest, None);
        assert_eq!(ConfigKey::Manifest.get(&config), "");
    }

    #[test]
    fn test_verify_checksums_requires_boolean() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::VerifyChecksums.set(&mut config, "maybe").is_err());
        ConfigKey::VerifyChecksums.set(&mut config, "TRUE").unwrap();
        assert!(config.report.verify_checksums);
    }
}

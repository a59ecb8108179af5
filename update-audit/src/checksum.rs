//! Checksum calculation for optional archive verification.
//!
//! Manifest checksums are opaque to ownership resolution. When verification is
//! requested, the shape of the declared value selects the algorithm: update
//! servers publish 8-digit Adler-32 sums, newer tooling may publish SHA-256.

use std::io::{self, Read};

use adler2::Adler32;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Buffer size for reading files during checksum calculation (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Supported checksum algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumKind {
    /// Adler-32, written as 8 hex digits.
    Adler32,
    /// SHA-256, written as 64 hex digits.
    Sha256,
}

impl ChecksumKind {
    /// Infer the algorithm from a declared checksum string.
    ///
    /// Returns `None` when the value is not a hex string of a known length.
    pub fn detect(declared: &str) -> Option<Self> {
        if !declared.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match declared.len() {
            8 => Some(Self::Adler32),
            64 => Some(Self::Sha256),
            _ => None,
        }
    }
}

/// Outcome of verifying one archive against its declared checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChecksumStatus {
    /// The archive matches its declared checksum.
    Match,
    /// The archive does not match.
    Mismatch { actual: String },
    /// The declared value is not in a recognised format.
    Unsupported,
    /// The archive could not be read for hashing.
    Failed { reason: String },
}

impl ChecksumStatus {
    /// Compare a computed checksum with the declared one (case-insensitive).
    pub fn compare(declared: &str, actual: String) -> Self {
        if declared.eq_ignore_ascii_case(&actual) {
            Self::Match
        } else {
            Self::Mismatch { actual }
        }
    }

    /// Check if this outcome should be flagged in a report.
    pub fn is_problem(&self) -> bool {
        matches!(self, Self::Mismatch { .. } | Self::Failed { .. })
    }
}

/// Calculate a checksum over everything `reader` yields.
///
/// # Returns
///
/// The lowercase hexadecimal checksum; Adler-32 is zero-padded to 8 digits.
pub fn calculate_checksum<R: Read>(mut reader: R, kind: ChecksumKind) -> io::Result<String> {
    let mut buffer = vec![0u8; BUFFER_SIZE];

    match kind {
        ChecksumKind::Adler32 => {
            let mut hasher = Adler32::new();
            loop {
                let bytes_read = reader.read(&mut buffer)?;
                if bytes_read == 0 {
                    break;
                }
                hasher.write_slice(&buffer[..bytes_read]);
            }
            Ok(format!("{:08x}", hasher.checksum()))
        }
        ChecksumKind::Sha256 => {
            let mut hasher = Sha256::new();
            loop {
                let bytes_read = reader.read(&mut buffer)?;
                if bytes_read == 0 {
                    break;
                }
                hasher.update(&buffer[..bytes_read]);
            }
            Ok(format!("{:x}", hasher.finalize()))
        }
    }
}

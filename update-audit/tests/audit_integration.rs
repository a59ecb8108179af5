//! Integration tests for a full audit over real zip archives.
//!
//! These tests verify the complete flow:
//! - manifest file → zip inspection → ownership resolution
//! - liveness against a checked-out directory tree
//! - checksum verification and report rendering
//!
//! Run with: `cargo test --test audit_integration`

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use update_audit::archive::ZipInspector;
use update_audit::checksum::{calculate_checksum, ChecksumKind, ChecksumStatus};
use update_audit::manifest::Manifest;
use update_audit::probe::CheckoutProbe;
use update_audit::report::{render, ReportContext, ReportFormat};
use update_audit::UpdateAudit;

// ============================================================================
// Helper Functions
// ============================================================================

/// Write a stored (uncompressed) zip so entry sizes are predictable.
fn write_zip(dir: &Path, name: &str, files: &[(&str, &[u8])]) {
    let file = File::create(dir.join(name)).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (entry, content) in files {
        if entry.ends_with('/') {
            writer.add_directory(*entry, options).unwrap();
        } else {
            writer.start_file(*entry, options).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    writer.finish().unwrap();
}

/// Create `paths` as files (or directories, when ending in `/`) under `root`.
fn checkout(root: &Path, paths: &[&str]) {
    for path in paths {
        let target = root.join(path);
        if path.ends_with('/') {
            fs::create_dir_all(&target).unwrap();
        } else {
            fs::create_dir_all(target.parent().unwrap()).unwrap();
            fs::write(&target, b"live").unwrap();
        }
    }
}

fn adler32_of(path: &Path) -> String {
    calculate_checksum(File::open(path).unwrap(), ChecksumKind::Adler32).unwrap()
}

/// Two archives: `x` only in the old one, `y` in both, `z` only in the new one.
/// `x` and `z` are live; `y` has been deleted from the checkout.
struct Fixture {
    _temp: TempDir,
    updates: PathBuf,
    live: PathBuf,
}

fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let updates = temp.path().join("updates");
    let live = temp.path().join("checkout");
    fs::create_dir_all(&updates).unwrap();
    fs::create_dir_all(&live).unwrap();

    write_zip(
        &updates,
        "update-1.zip",
        &[("x.xml", b"0123456789"), ("y.xml", b"01234")],
    );
    write_zip(
        &updates,
        "update-2.zip",
        &[("y.xml", b"01234"), ("data/z.png", b"012")],
    );
    checkout(&live, &["x.xml", "data/z.png"]);

    Fixture {
        _temp: temp,
        updates,
        live,
    }
}

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_ownership_and_usage_end_to_end() {
    let fx = fixture();
    fs::write(
        fx.updates.join("resources2.txt"),
        "update-1.zip 00000001\nupdate-2.zip 00000002\n",
    )
    .unwrap();

    let manifest = Manifest::load(&fx.updates.join("resources2.txt")).unwrap();
    let inspector = ZipInspector::new(&fx.updates);
    let probe = CheckoutProbe::new(&fx.live);

    let resolution = UpdateAudit::new(&inspector, &probe).run(&manifest);

    assert_eq!(resolution.owner_of("x.xml"), Some("update-1.zip"));
    assert_eq!(resolution.owner_of("y.xml"), Some("update-2.zip"));
    assert_eq!(resolution.owner_of("data/z.png"), Some("update-2.zip"));

    let old = resolution.archive("update-1.zip").unwrap();
    assert_eq!(old.used_entries, 1);
    assert_eq!(old.used_bytes, 10);
    assert_eq!(old.compressed_total, 15);
    assert!(!old.entries["y.xml"].is_owner);

    let new = resolution.archive("update-2.zip").unwrap();
    assert_eq!(new.used_entries, 1);
    assert_eq!(new.used_bytes, 3);
    assert!(new.entries["y.xml"].is_owner);
    assert!(!new.entries["y.xml"].is_live);

    let stats = resolution.statistics();
    assert_eq!(stats.total_declared, 23);
    assert_eq!(stats.total_used, 13);
    assert_eq!(stats.obsoleted_size, 10);
    assert_eq!(
        stats.total_archive_size,
        fs::metadata(fx.updates.join("update-1.zip")).unwrap().len()
            + fs::metadata(fx.updates.join("update-2.zip")).unwrap().len()
    );
    assert_eq!(stats.total_overhead, stats.total_archive_size - 23);
}

#[test]
fn test_corrupt_and_missing_archives_are_reported_inline() {
    let fx = fixture();
    fs::write(fx.updates.join("broken.zip"), b"definitely not a zip").unwrap();
    let manifest = Manifest::parse(
        "update-1.zip 1\nbroken.zip 2\nmissing.zip 3\nupdate-2.zip 4\n",
    )
    .unwrap();

    let inspector = ZipInspector::new(&fx.updates);
    let probe = CheckoutProbe::new(&fx.live);
    let resolution = UpdateAudit::new(&inspector, &probe).run(&manifest);

    let broken = resolution.archive("broken.zip").unwrap();
    assert!(broken.is_unreadable());
    assert_eq!(broken.archive_size, 20);
    assert_eq!(broken.used_percentage(), None);

    let missing = resolution.archive("missing.zip").unwrap();
    assert!(missing.is_unreadable());
    assert_eq!(missing.archive_size, 0);

    // Readable archives on either side still resolve normally.
    assert_eq!(resolution.owner_of("x.xml"), Some("update-1.zip"));
    assert_eq!(resolution.owner_of("y.xml"), Some("update-2.zip"));
    assert_eq!(resolution.statistics().unreadable_count, 2);

    let text = render(&resolution, ReportFormat::Text, &ReportContext::default()).unwrap();
    assert!(text.contains("broken.zip  2  0.0 KB  ERROR: invalid archive"));
}

#[test]
fn test_checksum_verification_against_files() {
    let fx = fixture();
    let good = adler32_of(&fx.updates.join("update-1.zip"));
    let manifest = Manifest::parse(&format!(
        "update-1.zip {}\nupdate-2.zip 00000000\n",
        good.to_uppercase()
    ))
    .unwrap();

    let inspector = ZipInspector::new(&fx.updates);
    let probe = CheckoutProbe::new(&fx.live);
    let resolution = UpdateAudit::new(&inspector, &probe)
        .with_checksum_verification(true)
        .run(&manifest);

    assert_eq!(
        resolution.archive("update-1.zip").unwrap().checksum_status,
        Some(ChecksumStatus::Match)
    );
    assert!(matches!(
        resolution.archive("update-2.zip").unwrap().checksum_status,
        Some(ChecksumStatus::Mismatch { .. })
    ));
}

#[test]
fn test_reports_in_every_format() {
    let fx = fixture();
    let manifest = Manifest::parse("update-1.zip H1\nupdate-2.zip H2\n").unwrap();
    let inspector = ZipInspector::new(&fx.updates);
    let probe = CheckoutProbe::new(&fx.live);
    let resolution = UpdateAudit::new(&inspector, &probe).run(&manifest);
    let context = ReportContext::new("https://updates.example.org/checkout/");

    let text = render(&resolution, ReportFormat::Text, &context).unwrap();
    assert!(text.contains("https://updates.example.org/checkout/data/z.png"));
    assert!(!text.contains("checkout/y.xml"));
    assert!(text.find("update-1.zip  H1").unwrap() < text.find("update-2.zip  H2").unwrap());

    let html = render(&resolution, ReportFormat::Html, &context).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("href=\"https://updates.example.org/checkout/x.xml\""));

    let json = render(&resolution, ReportFormat::Json, &context).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["statistics"]["obsoleted_size"], 10);
    assert_eq!(value["archives"][0]["name"], "update-1.zip");
}

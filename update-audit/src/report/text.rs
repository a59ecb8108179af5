//! Plain-text report.

use super::{entry_mark, format_kb, format_percentage, EntryMark, ReportContext};
use crate::checksum::ChecksumStatus;
use crate::usage::{ArchiveRecord, Resolution};

pub(super) fn render(resolution: &Resolution, context: &ReportContext) -> String {
    let mut lines = Vec::new();

    lines.push("Update Archive Usage Report".to_string());
    lines.push("===========================".to_string());
    if let Some(generated) = context.generated_label() {
        lines.push(format!("Generated: {}", generated));
    }
    lines.push(String::new());

    // Summary per archive
    lines.push("Archives".to_string());
    lines.push("--------".to_string());
    if resolution.archives().is_empty() {
        lines.push("  No archives listed.".to_string());
    }
    for archive in resolution.display_order() {
        lines.push(summary_line(archive));
        if let Some(status) = &archive.checksum_status {
            if let Some(note) = checksum_note(status) {
                lines.push(format!("    {}", note));
            }
        }
    }
    lines.push(String::new());

    // Totals
    let stats = resolution.statistics();
    lines.push("Totals".to_string());
    lines.push("------".to_string());
    lines.push(format!(
        "Declared size:     {} + {} zip overhead",
        format_kb(stats.total_declared),
        format_kb(stats.total_overhead)
    ));
    lines.push(format!(
        "Uncompressed size: {}",
        format_kb(stats.total_uncompressed)
    ));
    lines.push(format!(
        "Obsoleted size:    {} ({:.1}%)",
        format_kb(stats.obsoleted_size),
        stats.obsoleted_percentage()
    ));
    if stats.unreadable_count > 0 {
        lines.push(format!("Unreadable archives: {}", stats.unreadable_count));
    }
    lines.push(String::new());

    // Owner index
    lines.push("Entry Index".to_string());
    lines.push("-----------".to_string());
    for (path, owner) in resolution.index().iter() {
        let download = resolution
            .archive(owner)
            .and_then(|a| a.entries.get(path))
            .filter(|e| e.is_downloadable())
            .map(|_| format!("  {}", context.download_url(path)))
            .unwrap_or_default();
        lines.push(format!("  {}  [{}]{}", path, owner, download));
    }
    lines.push(String::new());

    // Contents per archive
    lines.push("Archive Contents".to_string());
    lines.push("----------------".to_string());
    for archive in resolution.display_order() {
        lines.push(format!("\n  {}:", archive.name));
        if let Some(error) = &archive.read_error {
            lines.push(format!("    unreadable: {}", error));
            continue;
        }
        for entry in archive.entries.values() {
            let mark = match entry_mark(resolution, entry) {
                EntryMark::Used => "[used]".to_string(),
                EntryMark::Obsolete => "[obsolete]".to_string(),
                EntryMark::OwnedBy(owner) => format!("[-> {}]", owner),
            };
            lines.push(format!("    {:<12} {}", mark, entry.path));
        }
    }
    lines.push(String::new());

    lines.join("\n")
}

fn summary_line(archive: &ArchiveRecord) -> String {
    match &archive.read_error {
        Some(error) => format!(
            "  {}  {}  {}  ERROR: {}",
            archive.name,
            archive.declared_checksum,
            format_kb(archive.archive_size),
            error
        ),
        None => format!(
            "  {}  {}  {}  {} uncompressed  used {} ({}/{})",
            archive.name,
            archive.declared_checksum,
            format_kb(archive.archive_size),
            format_kb(archive.uncompressed_total),
            format_percentage(archive.used_percentage()),
            archive.used_entries,
            archive.entry_count()
        ),
    }
}

fn checksum_note(status: &ChecksumStatus) -> Option<String> {
    match status {
        ChecksumStatus::Match => None,
        ChecksumStatus::Mismatch { actual } => {
            Some(format!("checksum MISMATCH (actual {})", actual))
        }
        ChecksumStatus::Unsupported => Some("checksum not verifiable".to_string()),
        ChecksumStatus::Failed { reason } => Some(format!("checksum failed: {}", reason)),
    }
}

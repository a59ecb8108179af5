//! HTML report with download links.

use super::{entry_mark, format_kb, format_percentage, EntryMark, ReportContext};
use crate::checksum::ChecksumStatus;
use crate::usage::{ArchiveRecord, Resolution};

const STYLE: &str = "body{font-family:monospace}\
table{border-collapse:collapse}\
td,th{padding:2px 8px;text-align:left}\
.used{color:#060}\
.obsolete{color:#999;text-decoration:line-through}\
.error{color:#c00}";

pub(super) fn render(resolution: &Resolution, context: &ReportContext) -> String {
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Update Archive Usage Report</title>\n");
    out.push_str(&format!("<style>{}</style>\n", STYLE));
    out.push_str("</head>\n<body>\n<h1>Update Archive Usage Report</h1>\n");
    if let Some(generated) = context.generated_label() {
        out.push_str(&format!("<p>Generated: {}</p>\n", generated));
    }

    // Summary per archive
    out.push_str("<h2>Archives</h2>\n<table>\n");
    out.push_str(
        "<tr><th>Archive</th><th>Checksum</th><th>Size</th><th>Uncompressed</th><th>Used</th></tr>\n",
    );
    for archive in resolution.display_order() {
        out.push_str(&summary_row(archive));
    }
    out.push_str("</table>\n");

    // Totals
    let stats = resolution.statistics();
    out.push_str("<h2>Totals</h2>\n<ul>\n");
    out.push_str(&format!(
        "<li>Declared size: {} + {} zip overhead</li>\n",
        format_kb(stats.total_declared),
        format_kb(stats.total_overhead)
    ));
    out.push_str(&format!(
        "<li>Uncompressed size: {}</li>\n",
        format_kb(stats.total_uncompressed)
    ));
    out.push_str(&format!(
        "<li>Obsoleted size: {} ({:.1}%)</li>\n",
        format_kb(stats.obsoleted_size),
        stats.obsoleted_percentage()
    ));
    if stats.unreadable_count > 0 {
        out.push_str(&format!(
            "<li class=\"error\">Unreadable archives: {}</li>\n",
            stats.unreadable_count
        ));
    }
    out.push_str("</ul>\n");

    // Owner index
    out.push_str("<h2>Entry Index</h2>\n<table>\n");
    for (path, owner) in resolution.index().iter() {
        let downloadable = resolution
            .archive(owner)
            .and_then(|a| a.entries.get(path))
            .is_some_and(|e| e.is_downloadable());
        let name = if downloadable {
            format!(
                "<a href=\"{}\">{}</a>",
                escape(&context.download_url(path)),
                escape(path)
            )
        } else {
            escape(path)
        };
        out.push_str(&format!(
            "<tr><td>{}</td><td><a href=\"#{}\">{}</a></td></tr>\n",
            name,
            anchor(owner),
            escape(owner)
        ));
    }
    out.push_str("</table>\n");

    // Contents per archive
    out.push_str("<h2>Archive Contents</h2>\n");
    for archive in resolution.display_order() {
        out.push_str(&format!(
            "<h3 id=\"{}\">{}</h3>\n",
            anchor(&archive.name),
            escape(&archive.name)
        ));
        if let Some(error) = &archive.read_error {
            out.push_str(&format!("<p class=\"error\">{}</p>\n", escape(error)));
            continue;
        }
        out.push_str("<ul>\n");
        for entry in archive.entries.values() {
            let line = match entry_mark(resolution, entry) {
                EntryMark::Used => format!("<li class=\"used\">{}</li>", escape(&entry.path)),
                EntryMark::Obsolete => {
                    format!("<li class=\"obsolete\">{}</li>", escape(&entry.path))
                }
                EntryMark::OwnedBy(owner) => format!(
                    "<li>{} &rarr; <a href=\"#{}\">{}</a></li>",
                    escape(&entry.path),
                    anchor(owner),
                    escape(owner)
                ),
            };
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str("</ul>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn summary_row(archive: &ArchiveRecord) -> String {
    let checksum = match &archive.checksum_status {
        Some(ChecksumStatus::Mismatch { actual }) => {
            flagged(&archive.declared_checksum, &format!("actual {}", actual))
        }
        Some(ChecksumStatus::Failed { reason }) => flagged(&archive.declared_checksum, reason),
        _ => escape(&archive.declared_checksum),
    };

    let usage = match &archive.read_error {
        Some(error) => format!("<td colspan=\"2\" class=\"error\">ERROR: {}</td>", escape(error)),
        None => format!(
            "<td>{}</td><td>{} ({}/{})</td>",
            format_kb(archive.uncompressed_total),
            format_percentage(archive.used_percentage()),
            archive.used_entries,
            archive.entry_count()
        ),
    };

    format!(
        "<tr><td><a href=\"#{}\">{}</a></td><td>{}</td><td>{}</td>{}</tr>\n",
        anchor(&archive.name),
        escape(&archive.name),
        checksum,
        format_kb(archive.archive_size),
        usage
    )
}

fn flagged(text: &str, title: &str) -> String {
    format!(
        "<span class=\"error\" title=\"{}\">{}</span>",
        escape(title),
        escape(text)
    )
}

/// Fragment identifier for an archive section.
fn anchor(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("archive-{}", slug)
}

/// Escape text for use in HTML content and attribute values.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::RawEntry;
    use crate::probe::StaticProbe;
    use crate::usage::{OwnershipResolver, PendingArchive};

    fn sample() -> Resolution {
        let probe = StaticProbe::new(["x", "z", "maps/", "a&b.txt"]);
        OwnershipResolver::new(&probe).resolve(vec![
            PendingArchive::new(
                "b.zip",
                "H2",
                1024,
                vec![RawEntry::file("y", 5, 5), RawEntry::file("z", 3, 3)],
            ),
            PendingArchive::new(
                "a.zip",
                "H1",
                1024,
                vec![
                    RawEntry::file("x", 10, 10),
                    RawEntry::file("y", 5, 5),
                    RawEntry::file("z", 3, 3),
                    RawEntry::file("a&b.txt", 1, 1),
                    RawEntry::directory("maps/"),
                ],
            ),
            PendingArchive::unreadable("old.zip", "H0", 10, "invalid <zip>"),
        ])
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_anchor() {
        assert_eq!(anchor("update-1.zip"), "archive-update-1-zip");
    }

    #[test]
    fn test_download_links() {
        let html = render(&sample(), &ReportContext::new("http://dl/"));

        assert!(html.contains("<a href=\"http://dl/x\">x</a>"));
        assert!(html.contains("<a href=\"http://dl/a&amp;b.txt\">a&amp;b.txt</a>"));
        assert!(!html.contains("http://dl/y"));
        assert!(!html.contains("http://dl/maps/"));
    }

    #[test]
    fn test_entry_classes() {
        let html = render(&sample(), &ReportContext::default());

        assert!(html.contains("<li class=\"used\">x</li>"));
        assert!(html.contains("<li class=\"obsolete\">y</li>"));
        assert!(html.contains("<li>z &rarr; <a href=\"#archive-b-zip\">b.zip</a></li>"));
    }

    #[test]
    fn test_unreadable_archive_row() {
        let html = render(&sample(), &ReportContext::default());

        assert!(html.contains("<td colspan=\"2\" class=\"error\">ERROR: invalid &lt;zip&gt;</td>"));
        assert!(html.contains("<p class=\"error\">invalid &lt;zip&gt;</p>"));
    }

    #[test]
    fn test_checksum_mismatch_is_flagged() {
        let probe = StaticProbe::default();
        let resolution = OwnershipResolver::new(&probe).resolve(vec![PendingArchive::new(
            "a.zip",
            "0000abcd",
            0,
            Vec::new(),
        )
        .with_checksum_status(ChecksumStatus::Mismatch {
            actual: "1111abcd".to_string(),
        })]);

        let html = render(&resolution, &ReportContext::default());
        assert!(html.contains("<span class=\"error\" title=\"actual 1111abcd\">0000abcd</span>"));
    }
}

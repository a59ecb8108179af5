//! JSON report.

use serde::Serialize;

use super::{ReportContext, ReportResult};
use crate::usage::{ArchiveRecord, GlobalStatistics, Resolution};

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_at: Option<String>,
    statistics: GlobalStatistics,
    archives: Vec<JsonArchive<'a>>,
    index: Vec<JsonIndexEntry<'a>>,
}

#[derive(Serialize)]
struct JsonArchive<'a> {
    #[serde(flatten)]
    record: &'a ArchiveRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    used_percentage: Option<f64>,
    overhead: u64,
}

#[derive(Serialize)]
struct JsonIndexEntry<'a> {
    path: &'a str,
    owner: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    download_url: Option<String>,
}

pub(super) fn render(resolution: &Resolution, context: &ReportContext) -> ReportResult<String> {
    let archives = resolution
        .display_order()
        .map(|record| JsonArchive {
            record,
            used_percentage: record.used_percentage(),
            overhead: record.overhead(),
        })
        .collect();

    let index = resolution
        .index()
        .iter()
        .map(|(path, owner)| {
            let downloadable = resolution
                .archive(owner)
                .and_then(|a| a.entries.get(path))
                .is_some_and(|e| e.is_downloadable());
            JsonIndexEntry {
                path,
                owner,
                download_url: downloadable.then(|| context.download_url(path)),
            }
        })
        .collect();

    let report = JsonReport {
        generated_at: context.generated_at.map(|at| at.to_rfc3339()),
        statistics: resolution.statistics(),
        archives,
        index,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

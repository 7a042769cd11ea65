use crate::runner::state::{Report, ReportSummary};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%SZ";

/// On-disk layout: the report fields plus its summary
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportDocument<'a> {
    #[serde(flatten)]
    report: &'a Report,
    summary: ReportSummary,
}

/// Serialize a report as pretty JSON
pub fn to_json(report: &Report) -> Result<String> {
    let doc = ReportDocument {
        report,
        summary: report.summary(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// `<dir>/<prefix><UTC timestamp>.json`
pub fn report_path(dir: &Path, prefix: &str, at: DateTime<Utc>) -> PathBuf {
    dir.join(format!("{}{}.json", prefix, at.format(TIMESTAMP_FORMAT)))
}

/// Append the report to a file named after the current UTC time
pub fn write(report: &Report, dir: &Path, prefix: &str) -> Result<PathBuf> {
    let json = to_json(report)?;
    let path = report_path(dir, prefix, Utc::now());

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory {}", dir.display()))?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open report file {}", path.display()))?;
    writeln!(file, "{}", json)
        .with_context(|| format!("Failed to write report file {}", path.display()))?;

    log::info!("Report written to {}", path.display());
    Ok(path)
}

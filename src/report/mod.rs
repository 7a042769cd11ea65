pub mod json;

use crate::runner::state::{Report, ReportSummary};
use anyhow::{Context, Result};
use std::path::Path;

/// Load a previously written report
pub fn load_report(path: &Path) -> Result<Report> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;
    let report: Report = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a load test report", path.display()))?;
    Ok(report)
}

/// Recompute and print the summary of a report file
pub fn summarize(path: &Path) -> Result<ReportSummary> {
    let summary = load_report(path)?.summary();
    crate::runner::events::print_summary(&summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::{CycleResult, WorkflowResult};

    #[test]
    fn test_summarize_written_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = Report::new("s");
        for run_number in 1..=2 {
            let mut cycle = CycleResult::new(run_number);
            let mut wf = WorkflowResult::new(0);
            wf.finish(None);
            cycle.push(wf);
            cycle.close();
            report.push(cycle);
        }
        report.finish();

        let path = json::write(&report, dir.path(), "r_").unwrap();
        let summary = summarize(&path).unwrap();
        assert_eq!(summary.total_runs, 2);
        assert_eq!(summary.total_users, 2);
        assert_eq!(summary.failed_users, 0);
    }

    #[test]
    fn test_rejects_other_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.json");
        std::fs::write(&path, r#"{"hello": 1}"#).unwrap();
        assert!(load_report(&path).is_err());
    }
}

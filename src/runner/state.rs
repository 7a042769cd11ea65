use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Throwaway platform account owned by one workflow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Upload,
    Download,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::Upload => write!(f, "upload"),
            StepKind::Download => write!(f, "download"),
        }
    }
}

/// Timing record for one upload or download
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub kind: StepKind,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub error: Option<String>,
}

impl StepResult {
    pub fn new(
        kind: StepKind,
        started: DateTime<Utc>,
        finished: DateTime<Utc>,
        error: Option<String>,
    ) -> Self {
        let elapsed_ms = (finished - started).num_milliseconds().max(0) as u64;
        Self {
            kind,
            started,
            finished,
            elapsed_ms,
            error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of one simulated user's workflow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResult {
    /// Zero-based position of the user within its cycle
    pub user: usize,
    /// Absent when provisioning failed
    pub account: Option<Account>,
    pub started: DateTime<Utc>,
    pub finished: Option<DateTime<Utc>>,
    pub uploads: Vec<StepResult>,
    pub downloads: Vec<StepResult>,
    pub error: Option<String>,
}

impl WorkflowResult {
    pub fn new(user: usize) -> Self {
        Self {
            user,
            account: None,
            started: Utc::now(),
            finished: None,
            uploads: Vec::new(),
            downloads: Vec::new(),
            error: None,
        }
    }

    pub fn record(&mut self, step: StepResult) {
        match step.kind {
            StepKind::Upload => self.uploads.push(step),
            StepKind::Download => self.downloads.push(step),
        }
    }

    pub fn finish(&mut self, error: Option<String>) {
        self.error = error;
        self.finished = Some(Utc::now());
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// One cycle of concurrent users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CycleResult {
    pub run_number: u32,
    pub started: DateTime<Utc>,
    pub finished: Option<DateTime<Utc>>,
    pub users: Vec<WorkflowResult>,
}

impl CycleResult {
    pub fn new(run_number: u32) -> Self {
        Self {
            run_number,
            started: Utc::now(),
            finished: None,
            users: Vec::new(),
        }
    }

    pub fn push(&mut self, workflow: WorkflowResult) {
        self.users.push(workflow);
    }

    pub fn close(&mut self) {
        self.finished = Some(Utc::now());
    }

    pub fn failed_users(&self) -> usize {
        self.users.iter().filter(|u| !u.is_ok()).count()
    }
}

/// Every cycle of a load test run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub runs: Vec<CycleResult>,
}

impl Report {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            runs: Vec::new(),
        }
    }

    pub fn push(&mut self, cycle: CycleResult) {
        self.runs.push(cycle);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn summary(&self) -> ReportSummary {
        let users = || self.runs.iter().flat_map(|r| r.users.iter());
        let total_users = users().count() as u32;
        let failed_users = users().filter(|u| !u.is_ok()).count() as u32;

        ReportSummary {
            session_id: self.session_id.clone(),
            total_runs: self.runs.len() as u32,
            total_users,
            succeeded_users: total_users - failed_users,
            failed_users,
            uploads: StepStats::collect(users().flat_map(|u| u.uploads.iter())),
            downloads: StepStats::collect(users().flat_map(|u| u.downloads.iter())),
            total_duration_ms: self
                .finished_at
                .map(|end| (end - self.started_at).num_milliseconds().max(0) as u64),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepStats {
    pub count: u32,
    pub failed: u32,
    pub min_ms: Option<u64>,
    pub max_ms: Option<u64>,
    pub avg_ms: Option<u64>,
}

impl StepStats {
    fn collect<'a>(steps: impl Iterator<Item = &'a StepResult>) -> Self {
        let mut stats = StepStats::default();
        let mut total: u64 = 0;

        for step in steps {
            stats.count += 1;
            if !step.is_ok() {
                stats.failed += 1;
            }
            total += step.elapsed_ms;
            stats.min_ms = Some(stats.min_ms.map_or(step.elapsed_ms, |m| m.min(step.elapsed_ms)));
            stats.max_ms = Some(stats.max_ms.map_or(step.elapsed_ms, |m| m.max(step.elapsed_ms)));
        }

        if stats.count > 0 {
            stats.avg_ms = Some(total / stats.count as u64);
        }
        stats
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub session_id: String,
    pub total_runs: u32,
    pub total_users: u32,
    pub succeeded_users: u32,
    pub failed_users: u32,
    pub uploads: StepStats,
    pub downloads: StepStats,
    pub total_duration_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn step(kind: StepKind, ms: i64, error: Option<&str>) -> StepResult {
        let started = Utc::now();
        StepResult::new(
            kind,
            started,
            started + Duration::milliseconds(ms),
            error.map(str::to_string),
        )
    }

    #[test]
    fn test_step_elapsed() {
        let s = step(StepKind::Upload, 1500, None);
        assert_eq!(s.elapsed_ms, 1500);
        assert!(s.is_ok());
    }

    #[test]
    fn test_record_routes_by_kind() {
        let mut wf = WorkflowResult::new(0);
        wf.record(step(StepKind::Upload, 10, None));
        wf.record(step(StepKind::Download, 20, None));
        wf.record(step(StepKind::Upload, 30, Some("boom")));
        assert_eq!(wf.uploads.len(), 2);
        assert_eq!(wf.downloads.len(), 1);
        assert_eq!(wf.uploads[1].error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_summary() {
        let mut report = Report::new("s1");
        let mut cycle = CycleResult::new(1);

        let mut ok = WorkflowResult::new(0);
        ok.record(step(StepKind::Upload, 100, None));
        ok.record(step(StepKind::Download, 40, None));
        ok.finish(None);
        cycle.push(ok);

        let mut bad = WorkflowResult::new(1);
        bad.record(step(StepKind::Upload, 300, Some("exit 1")));
        bad.finish(Some("exit 1".to_string()));
        cycle.push(bad);

        cycle.close();
        report.push(cycle);
        report.finish();

        let summary = report.summary();
        assert_eq!(summary.total_runs, 1);
        assert_eq!(summary.total_users, 2);
        assert_eq!(summary.failed_users, 1);
        assert_eq!(summary.succeeded_users, 1);
        assert_eq!(summary.uploads.count, 2);
        assert_eq!(summary.uploads.failed, 1);
        assert_eq!(summary.uploads.min_ms, Some(100));
        assert_eq!(summary.uploads.max_ms, Some(300));
        assert_eq!(summary.uploads.avg_ms, Some(200));
        assert_eq!(summary.downloads.avg_ms, Some(40));
        assert!(summary.total_duration_ms.is_some());
    }

    #[test]
    fn test_serialization_is_stable() {
        let mut report = Report::new("s1");
        let mut cycle = CycleResult::new(1);
        let mut wf = WorkflowResult::new(0);
        wf.account = Some(Account {
            id: "u1".to_string(),
            username: "abc".to_string(),
            password: "pw".to_string(),
        });
        wf.record(step(StepKind::Upload, 5, None));
        wf.finish(None);
        cycle.push(wf);
        cycle.close();
        report.push(cycle);

        let first = serde_json::to_string_pretty(&report).unwrap();
        let second = serde_json::to_string_pretty(&report).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("\"runNumber\": 1"));
        assert!(first.contains("\"kind\": \"upload\""));
    }
}

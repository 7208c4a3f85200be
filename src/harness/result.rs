//! Case outcomes and run summaries.

use std::process::ExitCode;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::errors::{AssertionMismatch, CaseError};

use super::probe::AssertionRecord;

/// Terminal state of one case.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CaseStatus {
    /// Every assertion held and the procedure completed.
    Passed,
    /// An assertion did not hold.
    Failed { mismatch: AssertionMismatch },
    /// The procedure raised or panicked.
    Errored { error: CaseError },
}

impl CaseStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CaseStatus::Passed => "PASS",
            CaseStatus::Failed { .. } => "FAIL",
            CaseStatus::Errored { .. } => "ERROR",
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, CaseStatus::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CaseStatus::Failed { .. })
    }

    pub fn is_errored(&self) -> bool {
        matches!(self, CaseStatus::Errored { .. })
    }
}

/// Result of running a single case.
#[derive(Debug, Serialize)]
pub struct CaseResult {
    pub name: String,
    #[serde(flatten)]
    pub status: CaseStatus,
    pub assertions: Vec<AssertionRecord>,
    #[serde(rename = "duration_ms", serialize_with = "millis")]
    pub duration: Duration,
}

/// Results of one suite, in registration order.
#[derive(Debug, Default, Serialize)]
pub struct SuiteSummary {
    pub name: String,
    pub results: Vec<CaseResult>,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    #[serde(rename = "duration_ms", serialize_with = "millis")]
    pub duration: Duration,
}

impl SuiteSummary {
    pub fn new(name: String) -> Self {
        SuiteSummary {
            name,
            ..Default::default()
        }
    }

    pub fn add_result(&mut self, result: CaseResult) {
        match &result.status {
            CaseStatus::Passed => self.passed += 1,
            CaseStatus::Failed { .. } => self.failed += 1,
            CaseStatus::Errored { .. } => self.errored += 1,
        }
        self.duration += result.duration;
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }
}

/// Overall summary of one run.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub suites: Vec<SuiteSummary>,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    /// Suites skipped by the run's filter.
    pub filtered_suites: usize,
    /// Registrations refused before the run.
    pub harness_errors: Vec<String>,
    #[serde(rename = "duration_ms", serialize_with = "millis")]
    pub duration: Duration,
}

impl RunSummary {
    pub fn new() -> Self {
        RunSummary::default()
    }

    pub fn add_suite(&mut self, summary: SuiteSummary) {
        self.passed += summary.passed;
        self.failed += summary.failed;
        self.errored += summary.errored;
        self.suites.push(summary);
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errored
    }

    /// True when every executed case passed and no registration was refused.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errored == 0 && self.harness_errors.is_empty()
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    /// `(suite, case, status label)` for every executed case, in run order.
    pub fn statuses(&self) -> Vec<(&str, &str, &'static str)> {
        self.suites
            .iter()
            .flat_map(|suite| {
                suite
                    .results
                    .iter()
                    .map(move |r| (suite.name.as_str(), r.name.as_str(), r.status.label()))
            })
            .collect()
    }
}

fn millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{CompareMode, MismatchKind};

    fn result(name: &str, status: CaseStatus) -> CaseResult {
        CaseResult {
            name: name.to_string(),
            status,
            assertions: Vec::new(),
            duration: Duration::from_millis(2),
        }
    }

    fn mismatch() -> AssertionMismatch {
        AssertionMismatch::new(CompareMode::Exact, MismatchKind::Value, "1", "2")
    }

    #[test]
    fn test_counts_accumulate() {
        let mut suite = SuiteSummary::new("s".to_string());
        suite.add_result(result("a", CaseStatus::Passed));
        suite.add_result(result("b", CaseStatus::Failed { mismatch: mismatch() }));
        suite.add_result(result("c", CaseStatus::Errored { error: CaseError::new("boom") }));
        assert_eq!((suite.passed, suite.failed, suite.errored), (1, 1, 1));
        assert_eq!(suite.duration, Duration::from_millis(6));

        let mut run = RunSummary::new();
        run.add_suite(suite);
        assert_eq!(run.total(), 3);
        assert!(!run.is_success());
        assert_eq!(
            run.statuses(),
            vec![("s", "a", "PASS"), ("s", "b", "FAIL"), ("s", "c", "ERROR")]
        );
    }

    #[test]
    fn test_harness_errors_fail_the_run() {
        let mut run = RunSummary::new();
        assert!(run.is_success());
        run.harness_errors.push("suite name must not be empty".to_string());
        assert!(!run.is_success());
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let json = serde_json::to_value(result("b", CaseStatus::Failed { mismatch: mismatch() }))
            .unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["mismatch"]["expected"], "1");
        assert_eq!(json["mismatch"]["kind"], "value");
        assert_eq!(json["duration_ms"], 2.0);
    }
}

//! Suite registry and sequential case execution.
//!
//! A [`Runner`] owns every registration; there is no process-wide registry.
//! The lifecycle is explicit:
//!
//! ```rust
//! use myjs::harness::Runner;
//! use myjs::value::Value;
//!
//! let mut runner = Runner::new();
//! runner
//!     .register_suite("Array tests", |suite| {
//!         suite.case("array init", |t| {
//!             let a1 = Value::array([1, 2, 3]);
//!             t.expect(a1.property("length")).to_be(3)
//!         });
//!     })
//!     .unwrap();
//!
//! let summary = runner.execute(&Default::default());
//! assert!(summary.is_success());
//! ```
//!
//! Cases run one at a time in registration order. Each gets a fresh
//! [`Probe`]; the first failing assertion ends the case (assertions return
//! `Result` and cases propagate them with `?`). A case that returns
//! [`Failure::Error`] or panics is reported as errored, never as failed.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use regex::Regex;
use termcolor::{ColorChoice, StandardStream};
use tracing::{debug, error, info, warn};

use crate::errors::{CaseError, Failure, HarnessError};

pub mod probe;
pub mod report;
pub mod result;

pub use probe::{AssertionRecord, Expectation, Probe};
pub use report::{JsonReporter, Reporter, TextReporter};
pub use result::{CaseResult, CaseStatus, RunSummary, SuiteSummary};

/// The body of a case.
pub type Procedure = Box<dyn Fn(&mut Probe) -> Result<(), Failure>>;

// ============================================================================
// REGISTRATION
// ============================================================================

/// A named example and its assertions.
pub struct Case {
    name: String,
    procedure: Procedure,
}

impl Case {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A named, ordered group of cases. Immutable once registered.
pub struct Suite {
    name: String,
    cases: Vec<Case>,
}

impl Suite {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    fn push(&mut self, case: Case) {
        if self.cases.iter().any(|c| c.name == case.name) {
            warn!(suite = %self.name, case = %case.name, "case name registered twice in one suite");
        }
        self.cases.push(case);
    }
}

/// Collects the cases of a suite during [`Runner::register_suite`].
pub struct SuiteBuilder {
    suite: Suite,
    error: Option<HarnessError>,
}

impl SuiteBuilder {
    /// Appends a case. An empty name rejects the whole suite.
    pub fn case<F>(&mut self, name: impl Into<String>, procedure: F) -> &mut Self
    where
        F: Fn(&mut Probe) -> Result<(), Failure> + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            self.error.get_or_insert(HarnessError::EmptyCaseName {
                suite: self.suite.name.clone(),
            });
            return self;
        }
        self.suite.push(Case {
            name,
            procedure: Box::new(procedure),
        });
        self
    }
}

// ============================================================================
// RUN OPTIONS
// ============================================================================

/// Which suites a run executes.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Only suites whose name matches run. `None` runs everything.
    pub filter: Option<Regex>,
}

impl RunOptions {
    pub fn with_filter(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            filter: Some(Regex::new(pattern)?),
        })
    }

    pub fn selects(&self, suite_name: &str) -> bool {
        self.filter
            .as_ref()
            .map_or(true, |filter| filter.is_match(suite_name))
    }
}

// ============================================================================
// RUNNER
// ============================================================================

/// Owns registered suites and executes them.
#[derive(Default)]
pub struct Runner {
    suites: Vec<Suite>,
    rejected: Vec<HarnessError>,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a suite whose cases are added by `builder`.
    ///
    /// Duplicate suite names are allowed and stay independent groups. On
    /// error nothing from this call is kept; the error is also recorded so
    /// that the run reports it.
    pub fn register_suite<F>(&mut self, name: &str, builder: F) -> Result<(), HarnessError>
    where
        F: FnOnce(&mut SuiteBuilder),
    {
        if name.is_empty() {
            return Err(self.reject(HarnessError::EmptySuiteName));
        }
        let mut suite_builder = SuiteBuilder {
            suite: Suite {
                name: name.to_string(),
                cases: Vec::new(),
            },
            error: None,
        };
        builder(&mut suite_builder);
        if let Some(error) = suite_builder.error {
            return Err(self.reject(error));
        }
        debug!(suite = name, cases = suite_builder.suite.cases.len(), "registered suite");
        self.suites.push(suite_builder.suite);
        Ok(())
    }

    /// Appends a case to the most recently registered suite named `suite_name`.
    pub fn register_case<F>(
        &mut self,
        suite_name: &str,
        case_name: &str,
        procedure: F,
    ) -> Result<(), HarnessError>
    where
        F: Fn(&mut Probe) -> Result<(), Failure> + 'static,
    {
        if case_name.is_empty() {
            return Err(self.reject(HarnessError::EmptyCaseName {
                suite: suite_name.to_string(),
            }));
        }
        let Some(index) = self.suites.iter().rposition(|s| s.name == suite_name) else {
            return Err(self.reject(HarnessError::UnknownSuite {
                suite: suite_name.to_string(),
                case: case_name.to_string(),
            }));
        };
        self.suites[index].push(Case {
            name: case_name.to_string(),
            procedure: Box::new(procedure),
        });
        Ok(())
    }

    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    /// Registrations refused so far.
    pub fn rejected(&self) -> &[HarnessError] {
        &self.rejected
    }

    pub fn case_count(&self) -> usize {
        self.suites.iter().map(|s| s.cases.len()).sum()
    }

    /// Executes every selected case once and returns the results. Writes
    /// nothing; runs share no state, so repeated calls are independent.
    pub fn execute(&self, options: &RunOptions) -> RunSummary {
        let start = Instant::now();
        let mut summary = RunSummary::new();
        summary.harness_errors = self.rejected.iter().map(ToString::to_string).collect();

        for suite in &self.suites {
            if !options.selects(&suite.name) {
                debug!(suite = %suite.name, "suite filtered out");
                summary.filtered_suites += 1;
                continue;
            }
            let mut suite_summary = SuiteSummary::new(suite.name.clone());
            for case in &suite.cases {
                suite_summary.add_result(run_case(&suite.name, case));
            }
            summary.add_suite(suite_summary);
        }

        summary.duration = start.elapsed();
        info!(
            total = summary.total(),
            passed = summary.passed,
            failed = summary.failed,
            errored = summary.errored,
            "run finished"
        );
        summary
    }

    /// Executes every case, writes the text report to standard output and
    /// returns whether everything passed.
    pub fn run(&self) -> bool {
        let summary = self.execute(&RunOptions::default());
        let choice = if atty::is(atty::Stream::Stdout) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut reporter = TextReporter::new(StandardStream::stdout(choice));
        if let Err(e) = reporter.report(&summary) {
            error!("failed to write the report: {e}");
            return false;
        }
        summary.is_success()
    }

    fn reject(&mut self, error: HarnessError) -> HarnessError {
        warn!("rejected registration: {error}");
        self.rejected.push(error.clone());
        error
    }
}

/// Runs one case: `Pending -> Running -> {Passed, Failed, Errored}`.
fn run_case(suite: &str, case: &Case) -> CaseResult {
    debug!(suite, case = %case.name, "running case");
    let mut probe = Probe::new();
    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| (case.procedure)(&mut probe)));
    let duration = start.elapsed();

    let status = match outcome {
        Ok(Ok(())) => CaseStatus::Passed,
        Ok(Err(Failure::Mismatch(mismatch))) => CaseStatus::Failed { mismatch },
        Ok(Err(Failure::Error(error))) => CaseStatus::Errored { error },
        Err(payload) => CaseStatus::Errored {
            error: CaseError::from_panic(payload),
        },
    };
    debug!(suite, case = %case.name, status = status.label(), "case finished");

    CaseResult {
        name: case.name.clone(),
        status,
        assertions: probe.into_records(),
        duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_suite_name_is_rejected_without_running_builder() {
        let mut runner = Runner::new();
        let mut called = false;
        let err = runner.register_suite("", |_| called = true).unwrap_err();
        assert_eq!(err, HarnessError::EmptySuiteName);
        assert!(!called);
        assert!(runner.suites().is_empty());
        assert_eq!(runner.rejected().len(), 1);
    }

    #[test]
    fn test_empty_case_name_rejects_only_that_suite() {
        let mut runner = Runner::new();
        let err = runner
            .register_suite("broken", |suite| {
                suite.case("fine", |_| Ok(()));
                suite.case("", |_| Ok(()));
            })
            .unwrap_err();
        assert!(matches!(err, HarnessError::EmptyCaseName { .. }));
        runner.register_suite("ok", |suite| {
            suite.case("fine", |_| Ok(()));
        })
        .unwrap();
        assert_eq!(runner.suites().len(), 1);
        assert_eq!(runner.case_count(), 1);
    }

    #[test]
    fn test_register_case_targets_latest_suite_with_name() {
        let mut runner = Runner::new();
        runner.register_suite("dup", |_| {}).unwrap();
        runner.register_suite("dup", |_| {}).unwrap();
        runner.register_case("dup", "late", |_| Ok(())).unwrap();
        assert_eq!(runner.suites()[0].cases().len(), 0);
        assert_eq!(runner.suites()[1].cases()[0].name(), "late");

        let err = runner.register_case("nope", "x", |_| Ok(())).unwrap_err();
        assert!(matches!(err, HarnessError::UnknownSuite { .. }));
    }

    #[test]
    fn test_panic_is_errored() {
        let mut runner = Runner::new();
        runner
            .register_suite("s", |suite| {
                suite.case("boom", |_| panic!("boom"));
            })
            .unwrap();
        let summary = runner.execute(&RunOptions::default());
        match &summary.suites[0].results[0].status {
            CaseStatus::Errored { error } => {
                assert!(error.panicked);
                assert_eq!(error.message, "boom");
            }
            other => panic!("expected errored, got {other:?}"),
        }
    }

    #[test]
    fn test_fail_fast_within_case() {
        let mut runner = Runner::new();
        runner
            .register_suite("s", |suite| {
                suite.case("stops", |t| {
                    t.expect(1).to_be(1)?;
                    t.expect(1).to_be(2)?;
                    Err(CaseError::new("unreachable").into())
                });
            })
            .unwrap();
        let summary = runner.execute(&RunOptions::default());
        let result = &summary.suites[0].results[0];
        assert!(result.status.is_failed());
        assert_eq!(result.assertions.len(), 2);
    }

    #[test]
    fn test_run_reports_overall_success() {
        let mut runner = Runner::new();
        runner.register_suite("s", |s| { s.case("ok", |t| t.expect(1).to_be(1)); }).unwrap();
        assert!(runner.run());
        runner.register_case("s", "bad", |t| t.expect(1).to_be(2)).unwrap();
        assert!(!runner.run());
    }

    #[test]
    fn test_filter_skips_suites() {
        let mut runner = Runner::new();
        runner.register_suite("Array tests", |s| { s.case("a", |_| Ok(())); }).unwrap();
        runner.register_suite("String tests", |s| { s.case("b", |_| Ok(())); }).unwrap();
        let summary = runner.execute(&RunOptions::with_filter("^Array").unwrap());
        assert_eq!(summary.total(), 1);
        assert_eq!(summary.filtered_suites, 1);
        assert_eq!(summary.suites[0].name, "Array tests");
    }
}

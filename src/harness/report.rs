//! Text and JSON renderings of a [`RunSummary`].

use std::io::{self, Write};

use difference::{Changeset, Difference};
use termcolor::{Color, ColorSpec, WriteColor};

use super::result::{CaseResult, CaseStatus, RunSummary};
use crate::errors::{AssertionMismatch, CaseError};

/// Writes a finished run somewhere.
pub trait Reporter {
    fn report(&mut self, summary: &RunSummary) -> io::Result<()>;
}

// ============================================================================
// TEXT
// ============================================================================

/// Human-readable report with optional colors.
pub struct TextReporter<W> {
    out: W,
}

impl<W: WriteColor> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn case(&mut self, result: &CaseResult) -> io::Result<()> {
        let color = match result.status {
            CaseStatus::Passed => Color::Green,
            CaseStatus::Failed { .. } => Color::Red,
            CaseStatus::Errored { .. } => Color::Magenta,
        };
        write!(self.out, "  ")?;
        self.colored(result.status.label(), color, true)?;
        writeln!(self.out, ": {}", result.name)?;

        match &result.status {
            CaseStatus::Passed => Ok(()),
            CaseStatus::Failed { mismatch } => self.mismatch(mismatch),
            CaseStatus::Errored { error } => self.error(error),
        }
    }

    fn mismatch(&mut self, mismatch: &AssertionMismatch) -> io::Result<()> {
        if !mismatch.path.is_root() {
            writeln!(self.out, "    at:       {}", mismatch.path)?;
        }
        let multi_line = mismatch.expected.contains('\n') || mismatch.actual.contains('\n');
        if multi_line {
            writeln!(self.out, "    diff ({} comparison):", mismatch.mode)?;
            let changeset = Changeset::new(&mismatch.expected, &mismatch.actual, "\n");
            self.diff(&changeset.diffs)?;
        } else {
            writeln!(self.out, "    expected: {}", mismatch.expected)?;
            writeln!(self.out, "    received: {}", mismatch.actual)?;
        }
        if let Some(note) = &mismatch.note {
            writeln!(self.out, "    note:     {note}")?;
        }
        Ok(())
    }

    fn error(&mut self, error: &CaseError) -> io::Result<()> {
        let prefix = if error.panicked { "panicked" } else { "error" };
        for (depth, message) in error.chain().iter().enumerate() {
            if depth == 0 {
                writeln!(self.out, "    {prefix}: {message}")?;
            } else {
                writeln!(self.out, "    caused by: {message}")?;
            }
        }
        Ok(())
    }

    fn diff(&mut self, diffs: &[Difference]) -> io::Result<()> {
        for diff in diffs {
            let (sign, color, text) = match diff {
                Difference::Same(x) => (' ', None, x),
                Difference::Rem(x) => ('-', Some(Color::Green), x),
                Difference::Add(x) => ('+', Some(Color::Red), x),
            };
            for line in text.lines() {
                self.out.set_color(ColorSpec::new().set_fg(color))?;
                write!(self.out, "      {sign} {line}")?;
                self.out.reset()?;
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    fn colored(&mut self, text: &str, color: Color, bold: bool) -> io::Result<()> {
        self.out
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold))?;
        write!(self.out, "{text}")?;
        self.out.reset()
    }
}

impl<W: WriteColor> Reporter for TextReporter<W> {
    fn report(&mut self, summary: &RunSummary) -> io::Result<()> {
        for suite in &summary.suites {
            self.colored(&suite.name, Color::Cyan, true)?;
            writeln!(self.out)?;
            for result in &suite.results {
                self.case(result)?;
            }
        }

        for error in &summary.harness_errors {
            self.colored("HARNESS", Color::Yellow, true)?;
            writeln!(self.out, ": {error}")?;
        }

        writeln!(self.out)?;
        write!(self.out, "{} total, ", summary.total())?;
        self.colored(&format!("{} passed", summary.passed), Color::Green, false)?;
        write!(self.out, ", ")?;
        self.colored(&format!("{} failed", summary.failed), Color::Red, false)?;
        write!(self.out, ", ")?;
        self.colored(&format!("{} errored", summary.errored), Color::Magenta, false)?;
        if summary.filtered_suites > 0 {
            write!(self.out, ", {} suites filtered", summary.filtered_suites)?;
        }
        if !summary.harness_errors.is_empty() {
            write!(self.out, ", {} harness errors", summary.harness_errors.len())?;
        }
        writeln!(self.out, " ({:.2?})", summary.duration)?;
        self.out.flush()
    }
}

// ============================================================================
// JSON
// ============================================================================

/// The summary as one pretty-printed JSON document.
pub struct JsonReporter<W> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, summary: &RunSummary) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, summary)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use termcolor::Buffer;

    use super::*;
    use crate::compare::{render, CompareMode, MismatchKind};
    use crate::harness::result::SuiteSummary;
    use crate::value::Value;

    fn summary(status: CaseStatus) -> RunSummary {
        let mut suite = SuiteSummary::new("Array tests".to_string());
        suite.add_result(CaseResult {
            name: "array compare".to_string(),
            status,
            assertions: Vec::new(),
            duration: Duration::ZERO,
        });
        let mut run = RunSummary::new();
        run.add_suite(suite);
        run
    }

    fn text(summary: &RunSummary) -> String {
        let mut reporter = TextReporter::new(Buffer::no_color());
        reporter.report(summary).unwrap();
        String::from_utf8(reporter.into_inner().into_inner()).unwrap()
    }

    #[test]
    fn test_text_pass_and_summary_line() {
        let out = text(&summary(CaseStatus::Passed));
        assert!(out.starts_with("Array tests\n  PASS: array compare\n"));
        assert!(out.contains("1 total, 1 passed, 0 failed, 0 errored"));
        assert!(!out.contains("filtered"));
    }

    #[test]
    fn test_text_failure_shows_path_and_values() {
        let mismatch = AssertionMismatch::new(CompareMode::Deep, MismatchKind::Value, "'Eric'", "'Asher'")
            .at(crate::compare::ValuePath::key("first"));
        let out = text(&summary(CaseStatus::Failed { mismatch }));
        assert!(out.contains("  FAIL: array compare\n"));
        assert!(out.contains("    at:       first\n"));
        assert!(out.contains("    expected: 'Eric'\n"));
        assert!(out.contains("    received: 'Asher'\n"));
        assert!(out.contains("0 passed, 1 failed"));
    }

    #[test]
    fn test_text_multi_line_values_are_diffed() {
        let long = |tail: &str| {
            Value::array((0..12).map(|i| format!("{tail} number {i}")).collect::<Vec<_>>())
        };
        let mismatch = AssertionMismatch::new(
            CompareMode::Exact,
            MismatchKind::Reference,
            render(&long("entry")),
            render(&long("item")),
        );
        let out = text(&summary(CaseStatus::Failed { mismatch }));
        assert!(out.contains("diff (exact comparison):"));
        assert!(out.contains("-   'entry number 0',"));
        assert!(out.contains("+   'item number 0',"));
    }

    #[test]
    fn test_text_error_chain() {
        let error = CaseError::new("calling add with a boolean");
        let out = text(&summary(CaseStatus::Errored { error }));
        assert!(out.contains("  ERROR: array compare\n    error: calling add with a boolean\n"));
        assert!(out.contains("1 errored"));
    }

    #[test]
    fn test_json_document() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.report(&summary(CaseStatus::Passed)).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
        assert_eq!(json["passed"], 1);
        assert_eq!(json["suites"][0]["name"], "Array tests");
        assert_eq!(json["suites"][0]["results"][0]["status"], "passed");
    }
}

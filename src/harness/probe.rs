//! The assertion surface handed to each case.

use serde::Serialize;

use crate::compare::{self, render, CompareMode, MismatchKind, ValuePath};
use crate::errors::{AssertionMismatch, Failure};
use crate::value::{quote, Value};

/// One evaluated assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssertionRecord {
    pub check: &'static str,
    pub passed: bool,
}

/// Records every assertion a case makes. A fresh probe is created for each
/// case execution.
#[derive(Debug, Default)]
pub struct Probe {
    records: Vec<AssertionRecord>,
}

impl Probe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fluent assertion about `actual`.
    pub fn expect(&mut self, actual: impl Into<Value>) -> Expectation<'_> {
        Expectation {
            probe: self,
            actual: actual.into(),
        }
    }

    /// Compares `actual` with `expected` under `mode`.
    pub fn expect_equal(
        &mut self,
        actual: &Value,
        expected: &Value,
        mode: CompareMode,
    ) -> Result<(), Failure> {
        let check = match mode {
            CompareMode::Exact => "to_be",
            CompareMode::Deep => "to_equal",
            CompareMode::DeepOrdered => "to_strict_equal",
        };
        self.record(check, compare::expect_equal(actual, expected, mode))
    }

    pub fn records(&self) -> &[AssertionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<AssertionRecord> {
        self.records
    }

    fn record(
        &mut self,
        check: &'static str,
        outcome: Result<(), AssertionMismatch>,
    ) -> Result<(), Failure> {
        self.records.push(AssertionRecord {
            check,
            passed: outcome.is_ok(),
        });
        outcome.map_err(Failure::from)
    }
}

/// An assertion waiting for its matcher: `t.expect(actual).to_be(expected)`.
pub struct Expectation<'p> {
    probe: &'p mut Probe,
    actual: Value,
}

impl Expectation<'_> {
    /// Exact equality: SameValue for primitives, identity for containers.
    pub fn to_be(self, expected: impl Into<Value>) -> Result<(), Failure> {
        self.probe
            .expect_equal(&self.actual, &expected.into(), CompareMode::Exact)
    }

    /// Structural equality, mapping key order ignored.
    pub fn to_equal(self, expected: impl Into<Value>) -> Result<(), Failure> {
        self.probe
            .expect_equal(&self.actual, &expected.into(), CompareMode::Deep)
    }

    /// Structural equality, mapping key order included.
    pub fn to_strict_equal(self, expected: impl Into<Value>) -> Result<(), Failure> {
        self.probe
            .expect_equal(&self.actual, &expected.into(), CompareMode::DeepOrdered)
    }

    pub fn to_be_truthy(self) -> Result<(), Failure> {
        let outcome = if self.actual.is_truthy() {
            Ok(())
        } else {
            Err(self.mismatch(MismatchKind::Value, "a truthy value"))
        };
        self.probe.record("to_be_truthy", outcome)
    }

    pub fn to_be_falsy(self) -> Result<(), Failure> {
        let outcome = if self.actual.is_truthy() {
            Err(self.mismatch(MismatchKind::Value, "a falsy value"))
        } else {
            Ok(())
        };
        self.probe.record("to_be_falsy", outcome)
    }

    pub fn to_be_undefined(self) -> Result<(), Failure> {
        let outcome = compare::expect_equal(&self.actual, &Value::undefined(), CompareMode::Exact);
        self.probe.record("to_be_undefined", outcome)
    }

    pub fn to_be_nan(self) -> Result<(), Failure> {
        let outcome = if self.actual.is_nan() {
            Ok(())
        } else {
            Err(self.mismatch(MismatchKind::Value, "NaN"))
        };
        self.probe.record("to_be_nan", outcome)
    }

    /// `length` of a sequence or string.
    pub fn to_have_length(self, expected: usize) -> Result<(), Failure> {
        let outcome = match self.actual.length() {
            Some(length) if length == expected => Ok(()),
            Some(length) => Err(AssertionMismatch::new(
                CompareMode::Exact,
                MismatchKind::Length,
                format!("length {expected}"),
                format!("length {length}"),
            )
            .with_note(format!("value: {}", render(&self.actual)))),
            None => Err(self
                .mismatch(MismatchKind::Type, "a value with a length")
                .with_note(format!("{} has no length", self.actual.kind_name()))),
        };
        self.probe.record("to_have_length", outcome)
    }

    /// Own property `key` of a mapping.
    pub fn to_have_property(self, key: &str) -> Result<(), Failure> {
        let outcome = match self.actual.as_mapping() {
            Some(mapping) if mapping.has_own(key) => Ok(()),
            Some(_) => Err(AssertionMismatch::new(
                CompareMode::Exact,
                MismatchKind::MissingKey,
                format!("own property {}", quote(key)),
                render(&self.actual),
            )
            .at(ValuePath::key(key))),
            None => Err(self.mismatch(MismatchKind::Type, "an object")),
        };
        self.probe.record("to_have_property", outcome)
    }

    fn mismatch(&self, kind: MismatchKind, expected: &str) -> AssertionMismatch {
        AssertionMismatch::new(CompareMode::Exact, kind, expected, render(&self.actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_every_assertion() {
        let mut probe = Probe::new();
        assert!(probe.expect(3).to_be(3).is_ok());
        assert!(probe.expect("x").to_be("y").is_err());
        assert_eq!(
            probe.records(),
            &[
                AssertionRecord { check: "to_be", passed: true },
                AssertionRecord { check: "to_be", passed: false },
            ]
        );
    }

    #[test]
    fn test_truthiness_matchers() {
        let mut probe = Probe::new();
        assert!(probe.expect(Value::undefined()).to_be_falsy().is_ok());
        assert!(probe.expect(123).to_be_truthy().is_ok());
        match probe.expect(0).to_be_truthy() {
            Err(Failure::Mismatch(m)) => assert_eq!(m.expected, "a truthy value"),
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_length_and_property_matchers() {
        let mut probe = Probe::new();
        assert!(probe.expect(Value::array([1, 2, 3])).to_have_length(3).is_ok());
        assert!(probe.expect("cat").to_have_length(3).is_ok());
        assert!(probe.expect(5).to_have_length(1).is_err());

        let flight = Value::object([("number", 815)]);
        assert!(probe.expect(&flight).to_have_property("number").is_ok());
        match probe.expect(&flight).to_have_property("constructor") {
            Err(Failure::Mismatch(m)) => {
                assert_eq!(m.kind, MismatchKind::MissingKey);
                assert_eq!(m.path.to_string(), "constructor");
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_nan_matchers() {
        let mut probe = Probe::new();
        assert!(probe.expect(f64::NAN).to_be_nan().is_ok());
        assert!(probe.expect(f64::NAN).to_be(f64::NAN).is_ok());
        assert!(probe.expect(1).to_be_nan().is_err());
    }
}

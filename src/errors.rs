//! Error types for every failure mode of the runner.
//!
//! The taxonomy separates what went wrong inside a case from what went wrong
//! around it:
//!
//! - [`AssertionMismatch`]: an assertion's comparison did not hold. The case
//!   is reported as failed.
//! - [`CaseError`]: the example code itself raised (returned an error or
//!   panicked). The case is reported as errored.
//! - [`HarnessError`]: a suite or case could not be registered. Only that
//!   registration is rejected.
//! - [`LiteralError`]: literal text could not be read into a value.
//! - [`CliError`]: failures at the binary's edge.
//!
//! All of them implement [`miette::Diagnostic`] with `myjs::` codes.

use std::any::Any;

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Serialize;
use thiserror::Error;

use crate::compare::{CompareMode, MismatchKind, ValuePath};

// ============================================================================
// ASSERTION MISMATCH
// ============================================================================

/// An assertion whose comparison did not hold.
///
/// `expected` and `actual` are renderings of the first differing sub-values,
/// not of the whole compared values; `path` locates them.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic, Serialize)]
#[error("expected {expected}, received {actual}{}", location(.path))]
#[diagnostic(code(myjs::assertion_mismatch))]
pub struct AssertionMismatch {
    pub mode: CompareMode,
    pub kind: MismatchKind,
    pub path: ValuePath,
    pub expected: String,
    pub actual: String,
    #[help]
    pub note: Option<String>,
}

impl AssertionMismatch {
    pub fn new(
        mode: CompareMode,
        kind: MismatchKind,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            kind,
            path: ValuePath::root(),
            expected: expected.into(),
            actual: actual.into(),
            note: None,
        }
    }

    pub fn at(mut self, path: ValuePath) -> Self {
        self.path = path;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

fn location(path: &ValuePath) -> String {
    if path.is_root() {
        String::new()
    } else {
        format!(" at {path}")
    }
}

// ============================================================================
// CASE ERROR
// ============================================================================

/// The example code raised before or instead of completing its assertions.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(myjs::case_error))]
pub struct CaseError {
    pub message: String,
    pub panicked: bool,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl CaseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            panicked: false,
            source: None,
        }
    }

    /// Wraps an error raised by example code, keeping it as the source.
    pub fn wrap<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: error.to_string(),
            panicked: false,
            source: Some(Box::new(error)),
        }
    }

    /// Builds an error from a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic with a non-string payload".to_string()
        };
        Self {
            message,
            panicked: true,
            source: None,
        }
    }

    /// The message followed by every source in the chain.
    pub fn chain(&self) -> Vec<String> {
        let mut chain = vec![self.message.clone()];
        let mut next = std::error::Error::source(self);
        while let Some(err) = next {
            let text = err.to_string();
            if chain.last() != Some(&text) {
                chain.push(text);
            }
            next = err.source();
        }
        chain
    }
}

impl Serialize for CaseError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("CaseError", 2)?;
        s.serialize_field("panicked", &self.panicked)?;
        s.serialize_field("chain", &self.chain())?;
        s.end()
    }
}

// ============================================================================
// FAILURE
// ============================================================================

/// Why a case procedure stopped early. Returned by every assertion so that
/// `?` ends the case at the first failing check.
#[derive(Debug, Error)]
pub enum Failure {
    #[error(transparent)]
    Mismatch(#[from] AssertionMismatch),
    #[error(transparent)]
    Error(#[from] CaseError),
}

impl From<LiteralError> for Failure {
    fn from(error: LiteralError) -> Self {
        Failure::Error(CaseError::wrap(error))
    }
}

// ============================================================================
// HARNESS ERROR
// ============================================================================

/// A registration the runner refused.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum HarnessError {
    #[error("suite name must not be empty")]
    #[diagnostic(code(myjs::harness::empty_suite_name))]
    EmptySuiteName,

    #[error("case name must not be empty (suite '{suite}')")]
    #[diagnostic(code(myjs::harness::empty_case_name))]
    EmptyCaseName { suite: String },

    #[error("cannot add case '{case}': no suite named '{suite}' is registered")]
    #[diagnostic(
        code(myjs::harness::unknown_suite),
        help("register the suite with `register_suite` before adding cases to it")
    )]
    UnknownSuite { suite: String, case: String },
}

// ============================================================================
// LITERAL ERROR
// ============================================================================

/// Literal text that could not be read into a value.
#[derive(Debug, Error, Diagnostic)]
#[error("invalid literal: {message}")]
#[diagnostic(code(myjs::literal))]
pub struct LiteralError {
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: SourceSpan,
}

impl LiteralError {
    pub fn new(message: impl Into<String>, text: &str, start: usize, end: usize) -> Self {
        Self {
            message: message.into(),
            src: NamedSource::new("literal", text.to_string()),
            span: (start, end.saturating_sub(start)).into(),
        }
    }

    /// Byte offset of the offending text.
    pub fn offset(&self) -> usize {
        self.span.offset()
    }
}

// ============================================================================
// CLI ERROR
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("invalid --filter pattern")]
    #[diagnostic(
        code(myjs::cli::filter),
        help("the filter is a regular expression matched against suite names")
    )]
    Filter(#[from] regex::Error),

    #[error("failed to write the report")]
    #[diagnostic(code(myjs::cli::io))]
    Io(#[from] std::io::Error),
}


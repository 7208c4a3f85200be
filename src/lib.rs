//! `myjs`: named, self-checking examples about a dynamic scripting
//! language's values, executed by a small assertion runner.
//!
//! - [`value`]: the value model (primitives, shared containers, opaque handles).
//! - [`compare`]: exact and structural equality with first-difference paths.
//! - [`literal`]: reads expected values written in literal notation.
//! - [`harness`]: suite registry, sequential execution and reporting.
//! - [`catalog`]: the built-in example suites.

pub use crate::compare::{CompareMode, MismatchKind};
pub use crate::errors::{AssertionMismatch, CaseError, Failure, HarnessError, LiteralError};
pub use crate::harness::{Probe, RunOptions, RunSummary, Runner};
pub use crate::value::Value;

pub mod catalog;
pub mod cli;
pub mod compare;
pub mod errors;
pub mod harness;
pub mod literal;
pub mod logging;
pub mod value;

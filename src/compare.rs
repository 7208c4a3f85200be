//! Exact and structural equality over [`Value`]s.
//!
//! Comparison is resolved once per variant pair:
//!
//! | mode          | primitives | sequences           | mappings                     | opaques  |
//! |---------------|------------|---------------------|------------------------------|----------|
//! | `Exact`       | SameValue  | identity            | identity                     | identity |
//! | `Deep`        | SameValue  | element-wise, order | key set + per-key, any order | identity |
//! | `DeepOrdered` | SameValue  | element-wise, order | as `Deep`, key order too     | identity |
//!
//! SameValue is the scripting language's `Object.is`: `NaN` equals `NaN`
//! and `0` differs from `-0`.
//!
//! A failed comparison yields an [`AssertionMismatch`] describing the *first*
//! difference found: sequences are walked by index, mappings in the expected
//! value's key order.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::errors::AssertionMismatch;
use crate::value::{is_identifier, quote, Mapping, Primitive, Sequence, Value};

/// Renderings longer than this are reported in multi-line form.
const COMPACT_WIDTH: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompareMode {
    Exact,
    Deep,
    DeepOrdered,
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompareMode::Exact => "exact",
            CompareMode::Deep => "deep",
            CompareMode::DeepOrdered => "deep-ordered",
        })
    }
}

/// What kind of difference was found at the mismatch path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MismatchKind {
    /// Same kind of value, different contents.
    Value,
    /// Different kinds of value (for example a string where a number was expected).
    Type,
    /// Sequences of different lengths with an equal common prefix.
    Length,
    /// A key of the expected mapping is absent from the actual one.
    MissingKey,
    /// The actual mapping has a key the expected one lacks.
    UnexpectedKey,
    /// Same keys and values, different enumeration order.
    KeyOrder,
    /// Structurally equal containers that are not the same instance.
    Reference,
}

// ============================================================================
// PATHS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

/// Location of a sub-value, rendered like an accessor chain: `[0].first`,
/// `departure['IATA code']`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValuePath(Vec<PathSegment>);

impl ValuePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// A path of one mapping key.
    pub fn key(key: impl Into<String>) -> Self {
        Self(vec![PathSegment::Key(key.into())])
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn first(&self) -> Option<&PathSegment> {
        self.0.first()
    }

    fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Key(key) if is_identifier(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Key(key) => write!(f, "[{}]", quote(key))?,
            }
        }
        Ok(())
    }
}

impl Serialize for ValuePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Compares `actual` against `expected` under `mode`.
pub fn expect_equal(
    actual: &Value,
    expected: &Value,
    mode: CompareMode,
) -> Result<(), AssertionMismatch> {
    match mode {
        CompareMode::Exact => exact(actual, expected),
        CompareMode::Deep | CompareMode::DeepOrdered => {
            DeepWalk::new(mode).walk(actual, expected)
        }
    }
}

/// `Object.is` over values: primitives by SameValue, everything else by
/// identity.
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Primitive(x), Value::Primitive(y)) => same_primitive(x, y),
        (Value::Sequence(x), Value::Sequence(y)) => x.ptr_eq(y),
        (Value::Mapping(x), Value::Mapping(y)) => x.ptr_eq(y),
        (Value::Opaque(x), Value::Opaque(y)) => x.ptr_eq(y),
        _ => false,
    }
}

pub fn deep_equal(a: &Value, b: &Value) -> bool {
    expect_equal(a, b, CompareMode::Deep).is_ok()
}

/// Renders a value for a mismatch report: compact when short, multi-line
/// otherwise.
pub fn render(value: &Value) -> String {
    let compact = value.to_string();
    if compact.len() <= COMPACT_WIDTH {
        compact
    } else {
        value.pretty()
    }
}

// ============================================================================
// EXACT
// ============================================================================

fn same_primitive(a: &Primitive, b: &Primitive) -> bool {
    match (a, b) {
        (Primitive::Number(x), Primitive::Number(y)) => {
            (x.is_nan() && y.is_nan()) || (x == y && x.is_sign_negative() == y.is_sign_negative())
        }
        _ => a == b,
    }
}

fn exact(actual: &Value, expected: &Value) -> Result<(), AssertionMismatch> {
    if same_value(actual, expected) {
        return Ok(());
    }
    let mismatch = |kind| {
        AssertionMismatch::new(CompareMode::Exact, kind, render(expected), render(actual))
    };
    if actual.kind_name() != expected.kind_name() {
        return Err(mismatch(MismatchKind::Type));
    }
    let containers = matches!(
        (actual, expected),
        (Value::Sequence(_), Value::Sequence(_)) | (Value::Mapping(_), Value::Mapping(_))
    );
    if containers && deep_equal(actual, expected) {
        return Err(mismatch(MismatchKind::Reference).with_note(
            "the values have the same structure but are different instances; \
             compare them structurally to ignore identity",
        ));
    }
    if let (Value::Opaque(_), Value::Opaque(_)) = (actual, expected) {
        return Err(mismatch(MismatchKind::Reference));
    }
    Err(mismatch(MismatchKind::Value))
}

// ============================================================================
// DEEP
// ============================================================================

/// Recursive structural comparison. `open` holds the container pairs being
/// compared on the current branch; meeting a pair again means a cycle that is
/// equal so far.
struct DeepWalk {
    mode: CompareMode,
    path: ValuePath,
    open: Vec<(usize, usize)>,
}

impl DeepWalk {
    fn new(mode: CompareMode) -> Self {
        Self {
            mode,
            path: ValuePath::root(),
            open: Vec::new(),
        }
    }

    fn walk(&mut self, actual: &Value, expected: &Value) -> Result<(), AssertionMismatch> {
        match (actual, expected) {
            (Value::Primitive(a), Value::Primitive(e)) => {
                if same_primitive(a, e) {
                    Ok(())
                } else if actual.kind_name() != expected.kind_name() {
                    Err(self.mismatch(MismatchKind::Type, expected, actual))
                } else {
                    Err(self.mismatch(MismatchKind::Value, expected, actual))
                }
            }
            (Value::Sequence(a), Value::Sequence(e)) => {
                self.enter(a.addr(), e.addr(), |walk| walk.sequences(a, e))
            }
            (Value::Mapping(a), Value::Mapping(e)) => {
                self.enter(a.addr(), e.addr(), |walk| walk.mappings(a, e))
            }
            (Value::Opaque(a), Value::Opaque(e)) => {
                if a.ptr_eq(e) {
                    Ok(())
                } else {
                    Err(self.mismatch(MismatchKind::Reference, expected, actual))
                }
            }
            _ => Err(self.mismatch(MismatchKind::Type, expected, actual)),
        }
    }

    fn enter<F>(&mut self, a: usize, e: usize, compare: F) -> Result<(), AssertionMismatch>
    where
        F: FnOnce(&mut Self) -> Result<(), AssertionMismatch>,
    {
        if a == e || self.open.contains(&(a, e)) {
            return Ok(());
        }
        self.open.push((a, e));
        let result = compare(self);
        self.open.pop();
        result
    }

    fn sequences(&mut self, actual: &Sequence, expected: &Sequence) -> Result<(), AssertionMismatch> {
        let actual = actual.to_vec();
        let expected = expected.to_vec();
        for (index, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            self.path.push(PathSegment::Index(index));
            self.walk(a, e)?;
            self.path.pop();
        }
        if actual.len() == expected.len() {
            return Ok(());
        }
        let index = actual.len().min(expected.len());
        let missing = Value::undefined();
        let e = expected.get(index).unwrap_or(&missing);
        let a = actual.get(index).unwrap_or(&missing);
        self.path.push(PathSegment::Index(index));
        let mismatch = self.mismatch(MismatchKind::Length, e, a).with_note(format!(
            "expected length {}, received length {}",
            expected.len(),
            actual.len()
        ));
        self.path.pop();
        Err(mismatch)
    }

    fn mappings(&mut self, actual: &Mapping, expected: &Mapping) -> Result<(), AssertionMismatch> {
        for (key, e) in expected.entries() {
            self.path.push(PathSegment::Key(key.clone()));
            if !actual.has_own(&key) {
                let mismatch = self
                    .mismatch(MismatchKind::MissingKey, &e, &Value::undefined())
                    .with_note(format!("the received object has no key {}", quote(&key)));
                self.path.pop();
                return Err(mismatch);
            }
            self.walk(&actual.get(&key), &e)?;
            self.path.pop();
        }
        for (key, a) in actual.entries() {
            if !expected.has_own(&key) {
                let note = format!("the expected object has no key {}", quote(&key));
                self.path.push(PathSegment::Key(key));
                let mismatch = self
                    .mismatch(MismatchKind::UnexpectedKey, &Value::undefined(), &a)
                    .with_note(note);
                self.path.pop();
                return Err(mismatch);
            }
        }
        if self.mode == CompareMode::DeepOrdered {
            let (actual_keys, expected_keys) = (actual.keys(), expected.keys());
            if actual_keys != expected_keys {
                return Err(AssertionMismatch::new(
                    self.mode,
                    MismatchKind::KeyOrder,
                    render(&Value::array(expected_keys)),
                    render(&Value::array(actual_keys)),
                )
                .at(self.path.clone())
                .with_note("keys are equal but enumerate in a different order"));
            }
        }
        Ok(())
    }

    fn mismatch(&self, kind: MismatchKind, expected: &Value, actual: &Value) -> AssertionMismatch {
        let mismatch = AssertionMismatch::new(self.mode, kind, render(expected), render(actual))
            .at(self.path.clone());
        if kind == MismatchKind::Type {
            let note = format!(
                "expected a value of type {}, received {}",
                expected.kind_name(),
                actual.kind_name()
            );
            return mismatch.with_note(note);
        }
        mismatch
    }
}

//! The values that assertions compare.
//!
//! A [`Value`] is a tagged variant over primitives, ordered sequences,
//! string-keyed mappings and opaque host handles. Sequences, mappings and
//! opaques are shared handles: cloning a `Value` clones the reference, so two
//! clones are the *same* container under exact comparison while two separately
//! built containers with equal contents are not.
//!
//! # Examples
//!
//! ```rust
//! use myjs::value::{Sequence, Value};
//!
//! let names = Sequence::new();
//! names.push("Eric");
//! names.push("Asher");
//! assert_eq!(names.len(), 2);
//!
//! let v = Value::from(names);
//! assert_eq!(v.type_of(), "object");
//! assert_eq!(v.to_string(), "['Eric', 'Asher']");
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

// ============================================================================
// PRIMITIVES
// ============================================================================

/// A value with no identity: compared by value in every mode.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Primitive {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

// ============================================================================
// CONTAINERS
// ============================================================================

/// A shared, growable ordered list of values.
#[derive(Clone, Default)]
pub struct Sequence(Rc<RefCell<Vec<Value>>>);

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().push(value.into());
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Element at `index`, or `undefined` past the end.
    pub fn get(&self, index: usize) -> Value {
        self.0.borrow().get(index).cloned().unwrap_or_default()
    }

    /// Snapshot of the elements. The snapshot shares element containers with
    /// the sequence but not the list itself.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sequence({})", Value::Sequence(self.clone()))
    }
}

/// A shared, insertion-ordered map from property names to values.
#[derive(Clone, Default)]
pub struct Mapping(Rc<RefCell<IndexMap<String, Value>>>);

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<IndexMap<_, _>>();
        Self(Rc::new(RefCell::new(map)))
    }

    /// Sets `key`, returning the previous value. A replaced key keeps its
    /// original enumeration position.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.borrow_mut().insert(key.into(), value.into())
    }

    /// Own property `key`, or `undefined` when absent.
    pub fn get(&self, key: &str) -> Value {
        self.0.borrow().get(key).cloned().unwrap_or_default()
    }

    pub fn has_own(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    /// Own property or a method every plain object inherits.
    pub fn has_property(&self, key: &str) -> bool {
        self.has_own(key) || OBJECT_METHODS.contains(&key)
    }

    /// Property names in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// `(key, value)` pairs in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn ptr_eq(&self, other: &Mapping) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mapping({})", Value::Mapping(self.clone()))
    }
}

/// Methods visible on every plain object without being own properties.
const OBJECT_METHODS: &[&str] = &[
    "constructor",
    "hasOwnProperty",
    "isPrototypeOf",
    "propertyIsEnumerable",
    "toLocaleString",
    "toString",
    "valueOf",
];

thread_local! {
    static OBJECT_PROTOTYPE: Vec<(&'static str, Opaque)> = OBJECT_METHODS
        .iter()
        .map(|name| (*name, Opaque::function(*name)))
        .collect();
}

fn inherited_method(key: &str) -> Option<Opaque> {
    OBJECT_PROTOTYPE.with(|methods| {
        methods
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, method)| method.clone())
    })
}

// ============================================================================
// OPAQUE HANDLES
// ============================================================================

#[derive(Debug)]
struct OpaqueInner {
    type_name: &'static str,
    label: String,
}

/// A host value with no inspectable structure, such as a function. Only
/// identity is observable.
#[derive(Debug, Clone)]
pub struct Opaque(Rc<OpaqueInner>);

impl Opaque {
    pub fn new(type_name: &'static str, label: impl Into<String>) -> Self {
        Self(Rc::new(OpaqueInner {
            type_name,
            label: label.into(),
        }))
    }

    pub fn function(label: impl Into<String>) -> Self {
        Self::new("function", label)
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }

    pub fn ptr_eq(&self, other: &Opaque) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// Anything an assertion can be made about.
#[derive(Debug, Clone)]
pub enum Value {
    Primitive(Primitive),
    Sequence(Sequence),
    Mapping(Mapping),
    Opaque(Opaque),
}

impl Default for Value {
    fn default() -> Self {
        Value::Primitive(Primitive::Undefined)
    }
}

impl Value {
    pub fn undefined() -> Self {
        Value::Primitive(Primitive::Undefined)
    }

    pub fn null() -> Self {
        Value::Primitive(Primitive::Null)
    }

    /// Builds a fresh sequence.
    pub fn array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Sequence(Sequence::from_vec(
            items.into_iter().map(Into::into).collect(),
        ))
    }

    /// Builds a fresh mapping; keys enumerate in the order given.
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Mapping(Mapping::from_entries(entries))
    }

    /// Converts parsed JSON. Object keys keep their document order.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::null(),
            serde_json::Value::Bool(b) => Value::from(b),
            serde_json::Value::Number(n) => Value::from(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => {
                Value::array(items.into_iter().map(Value::from_json))
            }
            serde_json::Value::Object(map) => {
                Value::object(map.into_iter().map(|(k, v)| (k, Value::from_json(v))))
            }
        }
    }

    /// Short name of the variant, used in type mismatch reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Primitive(Primitive::Undefined) => "undefined",
            Value::Primitive(Primitive::Null) => "null",
            Value::Primitive(Primitive::Bool(_)) => "boolean",
            Value::Primitive(Primitive::Number(_)) => "number",
            Value::Primitive(Primitive::String(_)) => "string",
            Value::Sequence(_) => "array",
            Value::Mapping(_) => "object",
            Value::Opaque(o) => o.type_name(),
        }
    }

    /// The result of the `typeof` operator.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Primitive(Primitive::Null) | Value::Sequence(_) => "object",
            other => other.kind_name(),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Primitive(Primitive::Undefined))
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Primitive(Primitive::Number(n)) if n.is_nan())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Primitive(Primitive::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Primitive(Primitive::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Primitive(Primitive::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// `length` of a sequence or string (in UTF-16 code units, as the
    /// scripting language counts them).
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::Sequence(s) => Some(s.len()),
            Value::Primitive(Primitive::String(s)) => Some(s.encode_utf16().count()),
            _ => None,
        }
    }

    /// Property access (`v[key]`). Missing properties read as `undefined`.
    pub fn property(&self, key: &str) -> Value {
        match self {
            Value::Mapping(m) if m.has_own(key) => m.get(key),
            Value::Mapping(_) => inherited_method(key)
                .map(Value::Opaque)
                .unwrap_or_default(),
            Value::Sequence(s) => match key {
                "length" => Value::from(s.len()),
                _ => array_index(key).map(|i| s.get(i)).unwrap_or_default(),
            },
            Value::Primitive(Primitive::String(text)) => match key {
                "length" => Value::from(text.encode_utf16().count()),
                _ => array_index(key)
                    .and_then(|i| text.encode_utf16().nth(i))
                    .map(|unit| Value::from(String::from_utf16_lossy(&[unit])))
                    .unwrap_or_default(),
            },
            _ => Value::undefined(),
        }
    }

    /// Truthiness: `undefined`, `null`, `false`, `0`, `-0`, `NaN` and `""` are
    /// falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Primitive(Primitive::Undefined | Primitive::Null) => false,
            Value::Primitive(Primitive::Bool(b)) => *b,
            Value::Primitive(Primitive::Number(n)) => *n != 0.0 && !n.is_nan(),
            Value::Primitive(Primitive::String(s)) => !s.is_empty(),
            Value::Sequence(_) | Value::Mapping(_) | Value::Opaque(_) => true,
        }
    }

    /// `self || fallback`
    pub fn or_default(self, fallback: impl Into<Value>) -> Value {
        if self.is_truthy() {
            self
        } else {
            fallback.into()
        }
    }

    /// String conversion as done by template literals and `String(v)`.
    pub fn coerce_to_string(&self) -> String {
        match self {
            Value::Primitive(Primitive::String(s)) => s.clone(),
            Value::Primitive(Primitive::Number(n)) => format_number(*n),
            Value::Primitive(Primitive::Undefined) => "undefined".to_string(),
            Value::Primitive(Primitive::Null) => "null".to_string(),
            Value::Primitive(Primitive::Bool(b)) => b.to_string(),
            Value::Sequence(s) => s
                .to_vec()
                .iter()
                .map(|item| match item {
                    Value::Primitive(Primitive::Undefined | Primitive::Null) => String::new(),
                    other => other.coerce_to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Mapping(_) => "[object Object]".to_string(),
            Value::Opaque(o) => format!("{} {}() {{ [native code] }}", o.type_name(), o.label()),
        }
    }

    /// Multi-line literal rendering, one element or property per line.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = Renderer::new(true).write(&mut out, self, 0);
        out
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<Primitive> for Value {
    fn from(p: Primitive) -> Self {
        Value::Primitive(p)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Primitive(Primitive::Bool(b))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Primitive(Primitive::Number(n))
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Primitive(Primitive::Number(n as f64))
                }
            }
        )*
    };
}

from_integer!(i32, i64, u32, u64, usize);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Primitive(Primitive::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Primitive(Primitive::String(s))
    }
}

impl From<Sequence> for Value {
    fn from(s: Sequence) -> Self {
        Value::Sequence(s)
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Mapping(m)
    }
}

impl From<Opaque> for Value {
    fn from(o: Opaque) -> Self {
        Value::Opaque(o)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(Sequence::from_vec(items))
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

// ============================================================================
// DISPLAY
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Renderer::new(false).write(f, self, 0)
    }
}

/// Number formatting of the scripting language: integers without a fraction,
/// `NaN`, `Infinity`, `-Infinity`, and exponent form (`1e+21`, `1e-7`)
/// outside `[1e-6, 1e21)`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        // String(-0) is "0"
        "0".to_string()
    } else if (1e-6..1e21).contains(&n.abs()) {
        n.to_string()
    } else {
        let exponent_form = format!("{n:e}");
        match exponent_form.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => exponent_form,
        }
    }
}

/// A property key that names an array element: the canonical decimal form
/// of an index, so `"01"` and `"+1"` do not qualify.
fn array_index(key: &str) -> Option<usize> {
    key.parse::<usize>()
        .ok()
        .filter(|index| index.to_string() == key)
}

pub(crate) fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// Writes values in literal notation, breaking cycles with `[Circular]`.
struct Renderer {
    pretty: bool,
    open: Vec<usize>,
}

impl Renderer {
    fn new(pretty: bool) -> Self {
        Self {
            pretty,
            open: Vec::new(),
        }
    }

    fn write<W: fmt::Write>(&mut self, out: &mut W, value: &Value, depth: usize) -> fmt::Result {
        match value {
            Value::Primitive(p) => write_primitive(out, p),
            Value::Opaque(o) => write!(out, "[{} {}]", capitalize(o.type_name()), o.label()),
            Value::Sequence(s) => {
                let items = s.to_vec();
                self.container(out, s.addr(), depth, ('[', ']'), &items, |r, out, item, d| {
                    r.write(out, item, d)
                })
            }
            Value::Mapping(m) => {
                let entries = m.entries();
                self.container(out, m.addr(), depth, ('{', '}'), &entries, |r, out, (k, v), d| {
                    if is_identifier(k) {
                        out.write_str(k)?;
                    } else {
                        out.write_str(&quote(k))?;
                    }
                    out.write_str(": ")?;
                    r.write(out, v, d)
                })
            }
        }
    }

    fn container<W, T, F>(
        &mut self,
        out: &mut W,
        addr: usize,
        depth: usize,
        (open, close): (char, char),
        items: &[T],
        mut write_item: F,
    ) -> fmt::Result
    where
        W: fmt::Write,
        F: FnMut(&mut Self, &mut W, &T, usize) -> fmt::Result,
    {
        if self.open.contains(&addr) {
            return out.write_str("[Circular]");
        }
        if items.is_empty() {
            out.write_char(open)?;
            return out.write_char(close);
        }
        self.open.push(addr);
        out.write_char(open)?;
        let pad = open == '{' && !self.pretty;
        for (i, item) in items.iter().enumerate() {
            if self.pretty {
                out.write_char('\n')?;
                indent(out, depth + 1)?;
            } else if i > 0 {
                out.write_str(", ")?;
            } else if pad {
                out.write_char(' ')?;
            }
            write_item(self, out, item, depth + 1)?;
            if self.pretty {
                out.write_char(',')?;
            }
        }
        if self.pretty {
            out.write_char('\n')?;
            indent(out, depth)?;
        } else if pad {
            out.write_char(' ')?;
        }
        self.open.pop();
        out.write_char(close)
    }
}

fn write_primitive<W: fmt::Write>(out: &mut W, p: &Primitive) -> fmt::Result {
    match p {
        Primitive::Undefined => out.write_str("undefined"),
        Primitive::Null => out.write_str("null"),
        Primitive::Bool(b) => write!(out, "{b}"),
        // Negative zero is shown so that a SameValue mismatch is readable.
        Primitive::Number(n) if *n == 0.0 && n.is_sign_negative() => out.write_str("-0"),
        Primitive::Number(n) => out.write_str(&format_number(*n)),
        Primitive::String(s) => out.write_str(&quote(s)),
    }
}

fn indent<W: fmt::Write>(out: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str("  ")?;
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

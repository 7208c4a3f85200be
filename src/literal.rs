//! Reads expected values written in the scripting language's literal notation.
//!
//! ```rust
//! use myjs::literal;
//!
//! let v = literal::parse("[{ first: 'Eric', last: 'White' }, { 'first-name': \"Jerome\" }]").unwrap();
//! assert_eq!(v.property("0").property("first").as_str(), Some("Eric"));
//! ```
//!
//! Supported: `undefined`, `null`, booleans, `NaN`, `Infinity`, decimal
//! numbers with optional fraction and exponent, single- and double-quoted
//! strings with `\uXXXX` escapes, arrays and object literals with bare,
//! quoted or numeric keys. Trailing commas and comments are allowed.

use pest::error::{ErrorVariant, InputLocation};
use pest::{iterators::Pair, Parser};
use pest_derive::Parser;

use crate::errors::LiteralError;
use crate::value::{format_number, Mapping, Value};

#[derive(Parser)]
#[grammar = "literal/grammar.pest"]
struct LiteralParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse one literal. Each array or object in the text becomes a fresh
/// container.
pub fn parse(text: &str) -> Result<Value, LiteralError> {
    let mut pairs =
        LiteralParser::parse(Rule::literal, text).map_err(|e| convert_parse_error(e, text))?;

    let literal = pairs.next().unwrap(); // pest guarantees the literal rule exists
    let value = literal.into_inner().next().unwrap(); // grammar requires exactly one value
    build_value(value, text)
}

// ============================================================================
// VALUE BUILDERS
// ============================================================================

fn build_value(pair: Pair<Rule>, text: &str) -> Result<Value, LiteralError> {
    match pair.as_rule() {
        Rule::object => {
            let mapping = Mapping::new();
            for property in pair.into_inner() {
                let mut parts = property.into_inner();
                let key = parts.next().unwrap(); // grammar guarantees key
                let value = parts.next().unwrap(); // grammar guarantees value
                mapping.insert(build_key(key, text)?, build_value(value, text)?);
            }
            Ok(Value::Mapping(mapping))
        }

        Rule::array => {
            let items = pair
                .into_inner()
                .map(|item| build_value(item, text))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::from(items))
        }

        Rule::string => build_string(pair, text).map(Value::from),

        Rule::number => build_number(&pair, text).map(Value::from),

        Rule::keyword => Ok(match pair.as_str() {
            "undefined" => Value::undefined(),
            "null" => Value::null(),
            "true" => Value::from(true),
            "false" => Value::from(false),
            _ => Value::from(f64::NAN),
        }),

        other => {
            let span = pair.as_span();
            Err(LiteralError::new(
                format!("unexpected {other:?}"),
                text,
                span.start(),
                span.end(),
            ))
        }
    }
}

fn build_key(pair: Pair<Rule>, text: &str) -> Result<String, LiteralError> {
    match pair.as_rule() {
        Rule::string => build_string(pair, text),
        // Numeric keys are normalized the way property names are: `{1.0: x}` has key "1".
        Rule::number => build_number(&pair, text).map(format_number),
        _ => Ok(pair.as_str().to_string()),
    }
}

fn build_number(pair: &Pair<Rule>, text: &str) -> Result<f64, LiteralError> {
    let raw = pair.as_str();
    match raw {
        "Infinity" => return Ok(f64::INFINITY),
        "-Infinity" => return Ok(f64::NEG_INFINITY),
        _ => {}
    }
    raw.parse::<f64>().map_err(|_| {
        let span = pair.as_span();
        LiteralError::new(
            format!("invalid number '{raw}'"),
            text,
            span.start(),
            span.end(),
        )
    })
}

fn build_string(pair: Pair<Rule>, text: &str) -> Result<String, LiteralError> {
    let inner = pair.into_inner().next().unwrap(); // grammar guarantees quoted content
    unescape(inner.as_str(), inner.as_span().start(), text)
}

/// Resolves escapes. `offset` is where `raw` starts in `text`, for error spans.
fn unescape(raw: &str, offset: usize, text: &str) -> Result<String, LiteralError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();
    let mut pending_high: Option<(u16, usize)> = None;

    while let Some((at, ch)) = chars.next() {
        if ch != '\\' {
            flush_surrogate(&mut pending_high, offset, text)?;
            out.push(ch);
            continue;
        }
        let Some((_, escaped)) = chars.next() else {
            break;
        };
        if escaped == '\n' || escaped == '\r' {
            // Line continuation: the backslash and the line break vanish.
            if escaped == '\r' {
                chars.next_if(|&(_, c)| c == '\n');
            }
            continue;
        }
        if escaped != 'u' {
            flush_surrogate(&mut pending_high, offset, text)?;
            out.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                'b' => '\u{8}',
                'f' => '\u{c}',
                'v' => '\u{b}',
                '0' => '\0',
                // Any other escaped character stands for itself.
                other => other,
            });
            continue;
        }

        let hex: String = (0..4).filter_map(|_| chars.next().map(|(_, c)| c)).collect();
        let unit = if hex.len() == 4 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            u16::from_str_radix(&hex, 16).ok()
        } else {
            None
        }
        .ok_or_else(|| {
            LiteralError::new("invalid \\u escape", text, offset + at, offset + at + 2 + hex.len())
        })?;

        match (pending_high.take(), unit) {
            (Some((high, _)), 0xDC00..=0xDFFF) => {
                let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                // A high/low pair always forms a valid scalar value.
                out.extend(char::from_u32(code));
            }
            (Some((_, high_at)), _) => {
                return Err(lone_surrogate(offset + high_at, text));
            }
            (None, 0xD800..=0xDBFF) => pending_high = Some((unit, at)),
            (None, 0xDC00..=0xDFFF) => return Err(lone_surrogate(offset + at, text)),
            (None, _) => out.extend(char::from_u32(u32::from(unit))),
        }
    }
    flush_surrogate(&mut pending_high, offset, text)?;
    Ok(out)
}

fn flush_surrogate(
    pending_high: &mut Option<(u16, usize)>,
    offset: usize,
    text: &str,
) -> Result<(), LiteralError> {
    match pending_high.take() {
        Some((_, at)) => Err(lone_surrogate(offset + at, text)),
        None => Ok(()),
    }
}

fn lone_surrogate(at: usize, text: &str) -> LiteralError {
    LiteralError::new(
        "unpaired UTF-16 surrogate; strings must be valid Unicode",
        text,
        at,
        at + 6,
    )
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

fn convert_parse_error(error: pest::error::Error<Rule>, text: &str) -> LiteralError {
    let (start, end) = match error.location {
        InputLocation::Pos(pos) => (pos, pos),
        InputLocation::Span((start, end)) => (start, end),
    };
    let message = match &error.variant {
        ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
            let expected: Vec<String> = positives.iter().map(|rule| format!("{rule:?}")).collect();
            format!("expected {}", expected.join(" or "))
        }
        ErrorVariant::ParsingError { .. } => "unexpected input".to_string(),
        ErrorVariant::CustomError { message } => message.clone(),
    };
    LiteralError::new(message, text, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{deep_equal, expect_equal, CompareMode};

    #[test]
    fn test_primitives() {
        assert!(parse("undefined").unwrap().is_undefined());
        assert_eq!(parse("null").unwrap().type_of(), "object");
        assert_eq!(parse("true").unwrap().as_bool(), Some(true));
        assert!(parse("NaN").unwrap().is_nan());
        assert_eq!(parse("-Infinity").unwrap().as_number(), Some(f64::NEG_INFINITY));
        assert_eq!(parse("3.14159").unwrap().as_number(), Some(3.14159));
        assert_eq!(parse("-2e3").unwrap().as_number(), Some(-2000.0));
        assert_eq!(parse(".5").unwrap().as_number(), Some(0.5));
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(parse("'cat'").unwrap().as_str(), Some("cat"));
        assert_eq!(parse(r#""it's""#).unwrap().as_str(), Some("it's"));
        assert_eq!(parse(r"'\u0041'").unwrap().as_str(), Some("A"));
        assert_eq!(parse(r"'\uD83D\uDE00'").unwrap().as_str(), Some("😀"));
        assert_eq!(parse(r"'a\'b\nc'").unwrap().as_str(), Some("a'b\nc"));
        assert_eq!(parse(r"'😀'").unwrap().as_str(), Some("😀"));
        assert_eq!(parse("''").unwrap().as_str(), Some(""));
    }

    #[test]
    fn test_malformed_unicode_escapes_are_rejected() {
        assert!(parse(r"'\u41'").is_err());
        assert!(parse(r"'\u+041'").is_err());
        assert!(parse(r"'\uZZZZ'").is_err());
        assert!(parse(r"'\u'").is_err());
    }

    #[test]
    fn test_line_continuation_yields_nothing() {
        assert_eq!(parse("'ab\\\ncd'").unwrap().as_str(), Some("abcd"));
        assert_eq!(parse("'ab\\\r\ncd'").unwrap().as_str(), Some("abcd"));
        assert_eq!(parse(r"'a\nb'").unwrap().as_str(), Some("a\nb"));
    }

    #[test]
    fn test_lone_surrogate_is_rejected() {
        let err = parse(r"'x\uD83D'").unwrap_err();
        assert_eq!(err.offset(), 2);
    }

    #[test]
    fn test_object_keys_keep_order() {
        let v = parse("{ foo: 'foo', \"bar\": 10, 'first-name': 'Jerome', 1: true, }").unwrap();
        let keys = v.as_mapping().unwrap().keys();
        assert_eq!(keys, vec!["foo", "bar", "first-name", "1"]);
    }

    #[test]
    fn test_nested_literal() {
        let v = parse(
            "{
                airline: 'Oceanic', // carrier
                number: 815,
                departure: { IATA: 'SYD', time: '2004-09-22 14:55', city: 'Sydney' },
            }",
        )
        .unwrap();
        assert_eq!(v.property("departure").property("IATA").as_str(), Some("SYD"));
        assert_eq!(v.property("number").as_number(), Some(815.0));
    }

    #[test]
    fn test_each_parse_yields_fresh_containers() {
        let a = parse("[1, [2]]").unwrap();
        let b = parse("[1, [2]]").unwrap();
        assert!(deep_equal(&a, &b));
        assert!(expect_equal(&a, &b, CompareMode::Exact).is_err());
    }

    #[test]
    fn test_syntax_errors_carry_position() {
        // pest reports an unterminated array at the last element it read.
        let err = parse("[1, 2").unwrap_err();
        assert_eq!(err.offset(), 4);
        assert!(parse("{a: foo}").is_err());
        assert!(parse("[1] [2]").is_err());
        assert!(parse("").is_err());
    }
}

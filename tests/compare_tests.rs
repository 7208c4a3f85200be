// Equality properties of the comparison engine.

use myjs::compare::{deep_equal, expect_equal, PathSegment};
use myjs::value::Value;
use myjs::{literal, CompareMode, MismatchKind};

fn parse(text: &str) -> Value {
    literal::parse(text).unwrap()
}

#[test]
fn pairwise_equal_sequences_have_no_mismatch() {
    for mode in [CompareMode::Deep, CompareMode::DeepOrdered] {
        assert!(expect_equal(&parse("[1, 'a', [true, null]]"), &parse("[1, 'a', [true, null]]"), mode).is_ok());
    }
}

#[test]
fn sequence_mismatch_cites_first_differing_index() {
    let err = expect_equal(&parse("[1, 2, 9, 8]"), &parse("[1, 2, 3, 4]"), CompareMode::Deep).unwrap_err();
    assert_eq!(err.path.first(), Some(&PathSegment::Index(2)));

    let err = expect_equal(&parse("[1, 2, 3, 4]"), &parse("[1, 2]"), CompareMode::Deep).unwrap_err();
    assert_eq!(err.kind, MismatchKind::Length);
    assert_eq!(err.path.first(), Some(&PathSegment::Index(2)));
    assert_eq!(err.expected, "undefined");
    assert_eq!(err.actual, "3");
}

#[test]
fn mapping_order_is_ignored_in_deep_mode() {
    let a = parse("{a: 1, b: 2}");
    let b = parse("{b: 2, a: 1}");
    assert!(expect_equal(&a, &b, CompareMode::Deep).is_ok());
    assert!(expect_equal(&a, &b, CompareMode::DeepOrdered).is_err());
}

#[test]
fn distinct_instances_differ_exactly_but_match_deeply() {
    let a = parse("{ departure: { IATA: 'SYD' }, legs: [1, 2] }");
    let b = parse("{ departure: { IATA: 'SYD' }, legs: [1, 2] }");
    let err = expect_equal(&a, &b, CompareMode::Exact).unwrap_err();
    assert_eq!(err.kind, MismatchKind::Reference);
    assert!(deep_equal(&a, &b));
    assert!(expect_equal(&a, &a.clone(), CompareMode::Exact).is_ok());
}

#[test]
fn same_value_semantics_hold_in_every_mode() {
    for mode in [CompareMode::Exact, CompareMode::Deep, CompareMode::DeepOrdered] {
        assert!(expect_equal(&Value::from(f64::NAN), &Value::from(f64::NAN), mode).is_ok());
        assert!(expect_equal(&Value::from(0.0), &Value::from(-0.0), mode).is_err());
        assert!(expect_equal(&Value::undefined(), &Value::null(), mode).is_err());
    }
}

#[test]
fn missing_key_is_not_the_same_as_undefined_value() {
    let err = expect_equal(&parse("{a: 1}"), &parse("{a: 1, b: undefined}"), CompareMode::Deep).unwrap_err();
    assert_eq!(err.kind, MismatchKind::MissingKey);
    assert_eq!(err.path.to_string(), "b");
    assert_eq!(err.note.as_deref(), Some("the received object has no key 'b'"));
}

#[test]
fn mismatch_message_includes_path() {
    let err = expect_equal(
        &parse("{ departure: { IATA: 'LAX' } }"),
        &parse("{ departure: { IATA: 'SYD' } }"),
        CompareMode::Deep,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "expected 'SYD', received 'LAX' at departure.IATA");
}

//! Structural typing, overloads and class narrowing.

use crate::errors::{CaseError, Failure};
use crate::harness::Runner;
use crate::literal;
use crate::value::Value;

/// Reads only `x` and `y`, so any mapping carrying both is accepted.
fn calculate_length(v: &Value) -> f64 {
    let x = v.property("x").as_number().unwrap_or(f64::NAN);
    let y = v.property("y").as_number().unwrap_or(f64::NAN);
    (x * x + y * y).sqrt()
}

/// `a + b`: concatenation when either side is a string, addition for numbers.
fn add(a: &Value, b: &Value) -> Result<Value, Failure> {
    if a.as_str().is_some() || b.as_str().is_some() {
        return Ok(Value::from(a.coerce_to_string() + &b.coerce_to_string()));
    }
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => Ok(Value::from(x + y)),
        _ => Err(CaseError::new(format!(
            "add has no overload for ({}, {})",
            a.kind_name(),
            b.kind_name()
        ))
        .into()),
    }
}

enum Shape {
    Square { width: f64 },
    Rectangle { width: f64, height: f64 },
}

fn calculate_area(shape: &Shape) -> f64 {
    match *shape {
        Shape::Rectangle { width, height } => width * height,
        Shape::Square { width } => width * width,
    }
}

pub(super) fn register(runner: &mut Runner) {
    let _ = runner.register_suite("structural typing", |suite| {
        suite.case("structural type", |t| {
            let v = Value::object([
                ("x", Value::from(3)),
                ("y", Value::from(4)),
                ("name", Value::from("Zee")),
            ]);
            t.expect(calculate_length(&v)).to_be(5)
        });
    });

    let _ = runner.register_suite("interface", |suite| {
        suite.case("interface", |t| {
            let states = literal::parse(
                "[
                    { name: 'Alabama', capital: 'Montgomery' },
                    { name: 'Alaska', capital: 'Juneau' },
                    { name: 'Arizona', capital: 'Phoenix' },
                ]",
            )?;
            t.expect(states.property("0").property("name")).to_be("Alabama")
        });
    });

    let _ = runner.register_suite("function", |suite| {
        suite.case("function overload", |t| {
            let three = add(&Value::from(1), &Value::from(2))?;
            t.expect(three).to_be(3)?;
            let twelve = add(&Value::from("1"), &Value::from("2"))?;
            t.expect(twelve).to_be("12")
        });
    });

    let _ = runner.register_suite("class", |suite| {
        suite.case("class", |t| {
            let r = Shape::Rectangle {
                width: 3.0,
                height: 6.0,
            };
            t.expect(calculate_area(&r)).to_be(18)?;
            t.expect(calculate_area(&Shape::Square { width: 3.0 })).to_be(9)
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rejects_mixed_non_string_operands() {
        assert!(add(&Value::from(true), &Value::from(1)).is_err());
        let mixed = add(&Value::from(1), &Value::from("2")).unwrap();
        assert_eq!(mixed.as_str(), Some("12"));
    }
}

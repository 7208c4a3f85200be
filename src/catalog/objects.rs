//! Object literals, property access and enumeration.

use crate::errors::CaseError;
use crate::harness::Runner;
use crate::literal;
use crate::value::{Mapping, Sequence, Value};

const FLIGHT: &str = "{
    airline: 'Oceanic',
    number: 815,
    departure: { IATA: 'SYD', time: '2004-09-22 14:55', city: 'Sydney' },
    arrival: { IATA: 'LAX', time: '2004-09-23 10:42', city: 'Los Angeles' },
}";

fn foo_bar() -> Value {
    Value::object([("foo", Value::from("foo")), ("bar", Value::from(10))])
}

/// `'height' in shape ? width * height : width * width`
fn calculate_area(shape: &Mapping) -> Result<f64, CaseError> {
    let width = shape
        .get("width")
        .as_number()
        .ok_or_else(|| CaseError::new("shape has no numeric width"))?;
    if shape.has_property("height") {
        let height = shape
            .get("height")
            .as_number()
            .ok_or_else(|| CaseError::new("shape height is not a number"))?;
        Ok(width * height)
    } else {
        Ok(width * width)
    }
}

pub(super) fn register(runner: &mut Runner) {
    let _ = runner.register_suite("object tests", |suite| {
        suite
            .case("object literal", |t| {
                let stooge = literal::parse(r#"{ "first-name": "Jerome", "last-name": "Howard" }"#)?;
                t.expect(stooge.property("first-name")).to_be("Jerome")?;
                t.expect(stooge.property("last-name")).to_be("Howard")?;

                let stooge2 = literal::parse(r#"{ firstName: "Jerome", lastName: "Howard" }"#)?;
                t.expect(stooge2.property("firstName")).to_be("Jerome")?;
                t.expect(stooge2.property("lastName")).to_be("Howard")
            })
            .case("objects can nest / nested object literal", |t| {
                let flight = literal::parse(FLIGHT)?;
                t.expect(flight.property("departure").property("IATA"))
                    .to_be("SYD")
            })
            .case("retrieving non-existent property returns undefined", |t| {
                let foo = Value::object([("a", 1), ("b", 2)]);
                let mut z = "bar";
                t.expect(foo.property(z)).to_be_undefined()?;
                z = "a";
                t.expect(foo.property(z)).to_be(1)
            })
            .case("The || operator can be used to fill in default values", |t| {
                let foo = Value::object([("a", 1), ("b", 2)]);
                let zap = foo.property("bar").or_default(123);
                t.expect(zap).to_be(123)
            })
            .case("objects are passed by reference", |t| {
                let (a, b, c) = (Mapping::new(), Mapping::new(), Mapping::new());
                t.expect(a.ptr_eq(&b)).to_be(false)?;
                t.expect(b.ptr_eq(&c)).to_be(false)?;
                t.expect(Value::from(a.clone())).to_equal(b.clone())?;

                let a = Mapping::new();
                let (b, c) = (a.clone(), a.clone());
                t.expect(a.ptr_eq(&b)).to_be(true)?;
                t.expect(b.ptr_eq(&c)).to_be(true)?;
                // Writes through one handle are seen through the others.
                c.insert("seen", true);
                t.expect(Value::from(a)).to_be(b)
            })
            .case("typeof hasOwnProperty", |t| {
                let flight = literal::parse(FLIGHT)?;
                t.expect(flight.property("number").type_of()).to_be("number")?;
                t.expect(flight.property("airline").type_of()).to_be("string")?;
                t.expect(flight.property("arrival").type_of()).to_be("object")?;
                t.expect(flight.property("manifest").type_of()).to_be("undefined")?;
                t.expect(flight.property("toString").type_of()).to_be("function")?;
                t.expect(flight.property("constructor").type_of()).to_be("function")?;
                t.expect(&flight).to_have_property("number")?;
                let own = flight.as_mapping().map(|m| m.has_own("constructor"));
                t.expect(own.unwrap_or(true)).to_be(false)
            })
            .case("enumeration of properties", |t| {
                let obj = foo_bar();
                let a = Sequence::new();
                // for (property in obj)
                for property in obj.as_mapping().map(Mapping::keys).unwrap_or_default() {
                    let value = obj.property(&property);
                    a.push(format!("{property}: {}", value.coerce_to_string()));
                }
                t.expect(a.get(0)).to_be("foo: foo")?;
                t.expect(a.get(1)).to_be("bar: 10")?;
                t.expect(a).to_have_length(2)
            })
            .case("Object.entries enumeration of properties", |t| {
                let obj = foo_bar();
                let a = Sequence::new();
                for (key, value) in obj.as_mapping().map(Mapping::entries).unwrap_or_default() {
                    a.push(format!("{key}: {}", value.coerce_to_string()));
                }
                t.expect(Value::from(a.clone()))
                    .to_strict_equal(Value::array(["foo: foo", "bar: 10"]))?;
                t.expect(a).to_have_length(2)
            })
            .case("does object have property", |t| {
                let r = literal::parse("{ width: 4, height: 8, }")?;
                let shape = r
                    .as_mapping()
                    .ok_or_else(|| CaseError::new("rectangle literal is not an object"))?;
                t.expect(calculate_area(shape)?).to_be(32)?;
                let square = Mapping::from_entries([("width", 4)]);
                t.expect(calculate_area(&square)?).to_be(16)
            });
    });
}

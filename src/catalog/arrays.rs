use crate::harness::Runner;
use crate::literal;
use crate::value::{Sequence, Value};

fn name(first: &str, last: &str) -> Value {
    Value::object([("first", first), ("last", last)])
}

pub(super) fn register(runner: &mut Runner) {
    let _ = runner.register_suite("Array tests", |suite| {
        suite
            .case("array init", |t| {
                let a1 = Value::array([1, 2, 3]);
                t.expect(a1.property("length")).to_be(3)
            })
            .case("array compare", |t| {
                let a = Sequence::new();
                a.push(name("Eric", "White"));
                a.push(name("Asher", "White"));

                let expected = literal::parse(
                    "[
                        { first: 'Eric', last: 'White' },
                        { first: 'Asher', last: 'White' },
                    ]",
                )?;
                t.expect(a).to_equal(expected)
            });
    });
}

use crate::harness::Runner;
use crate::literal;
use crate::value::Value;

pub(super) fn register(runner: &mut Runner) {
    let _ = runner.register_suite("String tests", |suite| {
        suite
            .case("character code points in literal", |t| {
                let s1 = "\u{0041}";
                t.expect(s1).to_be("A")?;
                // The same escape as written in the scripting language.
                t.expect(literal::parse(r#""\u0041""#)?).to_be("A")
            })
            .case("toUpperCase", |t| {
                let s = "cat";
                t.expect(s.to_uppercase()).to_be("CAT")
            });
    });

    let _ = runner.register_suite("Number tests", |suite| {
        suite
            .case("isNaN", |t| {
                let n1 = Value::from(f64::NAN);
                t.expect(n1.is_nan()).to_be(true)?;
                t.expect(n1).to_be_nan()
            })
            .case("Math.floor", |t| {
                let n = literal::parse("3.14159")?;
                let floor = n.as_number().map(f64::floor);
                t.expect(floor.unwrap_or(f64::NAN)).to_be(3)
            });
    });
}

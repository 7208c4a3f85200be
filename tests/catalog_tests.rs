// The built-in catalogue, run the way the binary runs it.

use myjs::catalog;
use myjs::harness::{Reporter, RunOptions, TextReporter};
use termcolor::Buffer;

#[test]
fn every_catalogue_case_passes() {
    let runner = catalog::runner();
    assert!(runner.rejected().is_empty());
    let summary = runner.execute(&RunOptions::default());
    let failures: Vec<_> = summary
        .statuses()
        .into_iter()
        .filter(|(_, _, label)| *label != "PASS")
        .collect();
    assert!(failures.is_empty(), "{failures:?}");
    assert!(summary.is_success());
}

#[test]
fn catalogue_covers_every_named_case() {
    let runner = catalog::runner();
    let cases: Vec<(&str, &str)> = runner
        .suites()
        .iter()
        .flat_map(|s| s.cases().iter().map(move |c| (s.name(), c.name())))
        .collect();
    assert_eq!(cases.len(), 19);
    assert!(cases.contains(&("object tests", "The || operator can be used to fill in default values")));
    assert!(cases.contains(&("Number tests", "Math.floor")));
    assert!(cases.contains(&("function", "function overload")));
}

#[test]
fn filtered_text_report() {
    let summary = catalog::runner().execute(&RunOptions::with_filter("tests$").unwrap());
    let mut reporter = TextReporter::new(Buffer::no_color());
    reporter.report(&summary).unwrap();
    let out = String::from_utf8(reporter.into_inner().into_inner()).unwrap();
    assert!(out.contains("Array tests\n  PASS: array init\n"));
    assert!(out.contains("String tests\n  PASS: character code points in literal\n"));
    assert!(!out.contains("structural typing"));
    assert!(out.contains("15 total, 15 passed, 0 failed, 0 errored, 4 suites filtered"));
}

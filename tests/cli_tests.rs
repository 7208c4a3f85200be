// CLI behavior of the `myjs` binary.

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn myjs() -> Command {
    Command::cargo_bin("myjs").unwrap()
}

#[test]
fn runs_the_catalogue_by_default() {
    myjs()
        .assert()
        .success()
        .stdout(contains("PASS: array init").and(contains("19 total, 19 passed")));
}

#[test]
fn run_with_filter_and_no_color() {
    myjs()
        .args(["run", "--filter", "^Number", "--color", "never"])
        .assert()
        .success()
        .stdout(contains("Number tests").and(contains("Array tests").not()))
        .stdout(contains("\x1b[").not());
}

#[test]
fn json_report_parses() {
    let output = myjs().args(["run", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["passed"], 19);
    assert_eq!(json["failed"], 0);
    assert_eq!(json["suites"][0]["results"][1]["name"], "array compare");
}

#[test]
fn list_shows_suites_and_cases() {
    myjs()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Array tests\n  array init\n  array compare\n"));
}

#[test]
fn invalid_filter_reports_a_diagnostic() {
    myjs()
        .args(["run", "--filter", "("])
        .assert()
        .code(1)
        .stderr(contains("myjs::cli::filter").or(contains("invalid --filter pattern")));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    myjs().arg("explode").assert().code(2);
}

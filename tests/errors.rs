mod common;

use common::{cargo_bin, nested, source_file};
use predicates::prelude::*;

#[test]
fn test_lone_open_bracket_is_syntax_error() {
    let cfg = tempfile::tempdir().unwrap();
    let tf = source_file("[");
    cargo_bin(&cfg)
        .arg(tf.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("SyntaxError:").and(predicate::str::contains("'['")))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_lone_close_bracket_is_syntax_error() {
    let cfg = tempfile::tempdir().unwrap();
    let tf = source_file("]");
    cargo_bin(&cfg)
        .arg(tf.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("SyntaxError:").and(predicate::str::contains("^")))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_syntax_error_runs_nothing() {
    let cfg = tempfile::tempdir().unwrap();
    let tf = source_file("+++.]");
    cargo_bin(&cfg)
        .arg(tf.path())
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_nesting_past_limit_is_recursion_error_without_output() {
    let cfg = tempfile::tempdir().unwrap();
    let tf = source_file(&nested(101, ".-"));
    cargo_bin(&cfg)
        .arg(tf.path())
        .assert()
        .code(5)
        .stderr(predicate::str::contains("RecursionError:"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_nesting_at_limit_succeeds() {
    let cfg = tempfile::tempdir().unwrap();
    let tf = source_file(&nested(100, "-"));
    cargo_bin(&cfg)
        .arg(tf.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(Finished execution)"));
}

#[test]
fn test_exhausted_input_is_runtime_error() {
    let cfg = tempfile::tempdir().unwrap();
    let tf = source_file(",.");
    cargo_bin(&cfg)
        .arg(tf.path())
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("RuntimeError:"))
        .stdout(predicate::str::contains("Finished").not());
}

#[test]
fn test_missing_source_file_is_read_error() {
    let cfg = tempfile::tempdir().unwrap();
    let missing = cfg.path().join("nope.bf");
    cargo_bin(&cfg)
        .arg(&missing)
        .assert()
        .code(6)
        .stderr(predicate::str::contains("ReadError:"));
}

#[test]
fn test_no_color_keeps_diagnostics_plain() {
    let cfg = tempfile::tempdir().unwrap();
    let tf = source_file("]");
    cargo_bin(&cfg)
        .arg("--no-color")
        .arg(tf.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("\u{1b}[").not());
}

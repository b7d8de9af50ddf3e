use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn tally() -> Command {
    let mut cmd = Command::cargo_bin("tally").expect("binary exists");
    cmd.env_remove("TALLY_LOG");
    cmd
}

#[test]
fn tally_eval_prints_value() {
    tally()
        .arg("eval")
        .arg("(2+3)*4")
        .assert()
        .success()
        .stdout("20\n");
}

#[test]
fn tally_eval_with_steps() {
    tally()
        .args(["eval", "--steps", "8-3-2"])
        .assert()
        .success()
        .stdout("(1) 8 - 3 = 5\n(2) 5 - 2 = 3\n3\n");
}

#[test]
fn tally_eval_division_by_zero_fails() {
    tally()
        .args(["eval", "5/0"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("DivisionByZero"));
}

#[test]
fn tally_postfix_prints_reverse_polish() {
    tally()
        .args(["postfix", "2+3*4"])
        .assert()
        .success()
        .stdout("2 3 4 * +\n");
}

#[test]
fn tally_postfix_reports_unbalanced_parentheses() {
    tally()
        .args(["postfix", "(1+2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("UnbalancedParentheses"));
}

#[test]
fn tally_run_evaluates_each_line() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("sums.txt");
    fs::write(&script, "# warm up\n1+1\n\n2*3\n12+8\n").expect("write script");

    tally()
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout("2\n6\n20\n");
}

#[test]
fn tally_run_stops_at_failing_line() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("broken.txt");
    fs::write(&script, "7/2\n1 + 2\n9\n").expect("write script");

    tally()
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stdout("3\n")
        .stderr(predicate::str::contains("MalformedInput"))
        .stderr(predicate::str::contains("broken.txt:2"));
}

#[test]
fn tally_run_missing_file_is_io_error() {
    let dir = tempdir().expect("create temp dir");
    tally()
        .arg("run")
        .arg(dir.path().join("absent.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

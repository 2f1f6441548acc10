use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const ENV_VARS: &[&str] = &[
    "BUDGETBACKERS_HOST",
    "BUDGETBACKERS_EMAIL",
    "BUDGETBACKERS_PASSWORD",
    "BROWSER_DRIVER",
    "BROWSER_HEADLESS",
    "WEBDRIVER_URL",
    "COOKIES_DIR",
    "PYWALLET_TIMEZONE",
    "RUST_LOG",
];

fn pywallet(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("pywallet").unwrap();
    cmd.current_dir(dir);
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_report_command() {
    let dir = tempfile::tempdir().unwrap();
    pywallet(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("incomes-expenses-by-periods"))
        .stdout(predicate::str::contains("--filter"));

    pywallet(dir.path())
        .args(["ie", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--last"))
        .stdout(predicate::str::contains("--since"))
        .stdout(predicate::str::contains("--period"));
}

#[test]
fn test_missing_credentials() {
    let dir = tempfile::tempdir().unwrap();
    pywallet(dir.path())
        .args(["ie", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("BUDGETBACKERS_EMAIL"));
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn test_window_flags_are_exclusive() {
    let dir = tempfile::tempdir().unwrap();
    pywallet(dir.path())
        .args(["ie", "out.csv", "-n", "3", "--since", "2026-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_web_report_rejects_weeks() {
    let dir = tempfile::tempdir().unwrap();
    pywallet(dir.path())
        .env("BUDGETBACKERS_EMAIL", "me@example.com")
        .env("BUDGETBACKERS_PASSWORD", "secret")
        .args(["ie", "out.csv", "--by", "week"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("web reports are monthly"));
}

#[test]
fn test_malformed_period_span() {
    let dir = tempfile::tempdir().unwrap();
    pywallet(dir.path())
        .args(["ie", "out.csv", "-p", "2026-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected START:END"));
}

#[test]
fn test_last_beyond_calendar_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    pywallet(dir.path())
        .env("BUDGETBACKERS_EMAIL", "me@example.com")
        .env("BUDGETBACKERS_PASSWORD", "secret")
        .args(["ie", "out.csv", "-n", "4000000000", "--by", "year"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn test_settings_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("pywallet.toml"), "timezone = \"Mars/Olympus\"\n").unwrap();
    pywallet(dir.path())
        .args(["ie", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid timezone"));
}

#[test]
fn test_convert_with_bad_options() {
    let dir = tempfile::tempdir().unwrap();
    let options = dir.path().join("options.yaml");
    fs::write(&options, "read: {}\nwrite: {csv: {}}\n").unwrap();

    Command::cargo_bin("report-convert")
        .unwrap()
        .current_dir(dir.path())
        .arg(&options)
        .arg("statement.pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("read.pdf.table"));
}

#[test]
fn test_convert_requires_inputs() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("report-convert")
        .unwrap()
        .current_dir(dir.path())
        .arg("options.yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("INPUTS"));
}

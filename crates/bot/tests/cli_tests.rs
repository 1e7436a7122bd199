//! CLI integration tests
use predicates::prelude::*;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("corrector");
    cmd.env_remove("TELOXIDE_TOKEN").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--token"))
        .stdout(predicate::str::contains("TELOXIDE_TOKEN"))
        .stdout(predicate::str::contains("--languagetool-url"));
}

#[test]
fn test_cli_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("corrector"));
}

#[test]
fn test_cli_missing_token() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"))
        .stderr(predicate::str::contains("token is missing"));
}

#[test]
fn test_cli_placeholder_token() {
    cmd()
        .args(["--token", "you tg-bot token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("placeholder"));
}

#[test]
fn test_cli_placeholder_token_from_env() {
    cmd()
        .env("TELOXIDE_TOKEN", "YOUR_TELEGRAM_TOKEN_HERE")
        .assert()
        .failure()
        .stderr(predicate::str::contains("placeholder"));
}

#[test]
fn test_cli_malformed_token() {
    cmd()
        .args(["--token", "12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed"));
}

#[test]
fn test_cli_invalid_languagetool_url() {
    cmd()
        .args(["--token", "123456:ABCdef", "--languagetool-url", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a url"));
}

#[test]
fn test_cli_rejects_non_numeric_timeout() {
    cmd()
        .args(["--token", "123456:ABCdef", "--request-timeout", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--request-timeout"));
}

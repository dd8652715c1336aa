//! End-to-end CLI tests that exercise argument handling without touching
//! the network.

use assert_cmd::Command;
use predicates::prelude::*;

fn installer() -> Command {
    Command::cargo_bin("awsomarchy-install").unwrap()
}

#[test]
fn help_describes_the_installer() {
    installer()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Install or update the awsomarchy binary"))
        .stdout(predicate::str::contains("VERSION"))
        .stdout(predicate::str::contains("--dir"));
}

#[test]
fn version_flag_reports_crate_version() {
    installer()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn quiet_and_verbose_conflict() {
    installer()
        .args(["--quiet", "--verbose"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn unusable_version_string_fails_before_any_network_access() {
    // "v" normalizes to an empty string and is rejected during version
    // resolution, before the release host is contacted.
    installer()
        .arg("v")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid version string"));
}

use assert_cmd::prelude::*;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn rules_list_shows_catalog() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    Command::cargo_bin("rootcause-php")?
        .env("HOME", tmp.path())
        .env("NO_COLOR", "1")
        .arg("rules")
        .arg("list")
        .assert()
        .success()
        .stdout(
            contains("php.unsafe-deserialization")
                .and(contains("php.missing-sensitive-parameter"))
                .and(contains("php.query-builder-user-sort"))
                .and(contains("php.command-injection"))
                .and(contains("php.raw-sql"))
                .and(contains("CWE-532"))
                .and(contains("https://cwe.mitre.org/data/definitions/78.html"))
                .and(contains("5 rules, 5 enabled")),
        );
    Ok(())
}

#[test]
fn rules_list_marks_disabled_rules() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let config = tmp.path().join("config.toml");
    fs::write(&config, "[rules]\ndisabled = [\"php.command-injection\"]\n")?;

    Command::cargo_bin("rootcause-php")?
        .env("NO_COLOR", "1")
        .arg("rule")
        .arg("list")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(contains("php.command-injection (disabled)").and(contains("5 rules, 4 enabled")));
    Ok(())
}

#[test]
fn rules_list_rejects_unknown_ids() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let config = tmp.path().join("config.toml");
    fs::write(&config, "[rules]\ndisabled = [\"php.xss\"]\n")?;

    Command::cargo_bin("rootcause-php")?
        .arg("rules")
        .arg("list")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(contains("unknown rule id 'php.xss'"));
    Ok(())
}

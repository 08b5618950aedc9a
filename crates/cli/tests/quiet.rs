use assert_cmd::prelude::*;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn info_logs_printed_by_default() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let test_file = tmp.path().join("index.php");
    fs::write(&test_file, "<?php echo 'hi';\n")?;

    Command::cargo_bin("rootcause-php")?
        .env("HOME", tmp.path())
        .arg("scan")
        .arg(&test_file)
        .assert()
        .success()
        .stderr(
            contains("Scan started")
                .and(contains("Rules loaded"))
                .and(contains("Files queued"))
                .and(contains("Class index built"))
                .and(contains("Scan completed"))
                .and(contains("ROOTCAUSE  PHP  SCANNER")),
        );
    Ok(())
}

#[test]
fn quiet_flag_silences_logs_and_banner() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let test_file = tmp.path().join("index.php");
    fs::write(&test_file, "<?php\nunserialize($_POST['x']);\n")?;

    Command::cargo_bin("rootcause-php")?
        .env("HOME", tmp.path())
        .arg("scan")
        .arg(&test_file)
        .arg("--quiet")
        .assert()
        .success()
        .stderr("")
        .stdout(contains("php.unsafe-deserialization"));
    Ok(())
}

#[test]
fn machine_formats_skip_banner() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let test_file = tmp.path().join("index.php");
    fs::write(&test_file, "<?php echo 1;\n")?;

    Command::cargo_bin("rootcause-php")?
        .env("HOME", tmp.path())
        .arg("scan")
        .arg(&test_file)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stderr(contains("ROOTCAUSE").not());
    Ok(())
}

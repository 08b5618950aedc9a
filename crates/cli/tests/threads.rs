use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn zero_threads_argument_errors() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let test_file = tmp.path().join("index.php");
    fs::write(&test_file, "<?php echo 1;\n")?;

    Command::cargo_bin("rootcause-php")?
        .arg("scan")
        .arg(&test_file)
        .arg("--threads")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicates::str::contains("threads must be greater than 0"));
    Ok(())
}

#[test]
fn results_do_not_depend_on_thread_count() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    for i in 0..12 {
        fs::write(
            tmp.path().join(format!("f{i:02}.php")),
            format!("<?php\nfunction f{i}($password) {{ exec($_GET['c']); }}\n"),
        )?;
    }
    let run = |threads: &str| -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let output = Command::cargo_bin("rootcause-php")?
            .env("HOME", tmp.path())
            .arg("scan")
            .arg(tmp.path())
            .arg("--format")
            .arg("json")
            .arg("--threads")
            .arg(threads)
            .output()?;
        assert!(output.status.success());
        Ok(output.stdout)
    };
    assert_eq!(run("1")?, run("4")?);
    Ok(())
}

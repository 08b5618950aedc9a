use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn sarif_output_describes_rules_and_results() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let test_file = tmp.path().join("import.php");
    fs::write(
        &test_file,
        "<?php\n$data = $_POST['data'];\n$obj = unserialize($data);\n",
    )?;

    let output = Command::cargo_bin("rootcause-php")?
        .env("HOME", tmp.path())
        .arg("scan")
        .arg(&test_file)
        .arg("--format")
        .arg("sarif")
        .output()?;
    assert!(output.status.success());
    let sarif: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(sarif["version"], "2.1.0");

    let run = &sarif["runs"][0];
    let rules = run["tool"]["driver"]["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 5);
    let tags = rules
        .iter()
        .find(|r| r["id"] == "php.command-injection")
        .map(|r| r["properties"]["tags"].clone())
        .unwrap();
    assert!(tags.as_array().unwrap().iter().any(|t| t == "CWE-78"));

    let results = run["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["ruleId"], "php.unsafe-deserialization");
    assert_eq!(results[0]["level"], "error");
    let region = &results[0]["locations"][0]["physicalLocation"]["region"];
    assert_eq!(region["startLine"], 3);
    Ok(())
}

#[test]
fn disabled_rules_are_not_described() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let test_file = tmp.path().join("index.php");
    fs::write(&test_file, "<?php echo 1;\n")?;

    let output = Command::cargo_bin("rootcause-php")?
        .env("HOME", tmp.path())
        .arg("scan")
        .arg(&test_file)
        .arg("--format")
        .arg("sarif")
        .arg("--disable-rule")
        .arg("php.raw-sql")
        .output()?;
    let sarif: Value = serde_json::from_slice(&output.stdout)?;
    let rules = sarif["runs"][0]["tool"]["driver"]["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 4);
    assert!(rules.iter().all(|r| r["id"] != "php.raw-sql"));
    Ok(())
}

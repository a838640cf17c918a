use predicates::prelude::*;
use serde_json::Value;

mod common;

use common::Fixture;

#[test]
fn lists_the_catalog_and_marks_the_latest_entry() {
    let fixture = Fixture::new();

    fixture
        .venvup()
        .arg("versions")
        .assert()
        .success()
        .stdout(predicate::str::contains("3.12.3"))
        .stdout(predicate::str::contains("(latest)"))
        .stdout(predicate::str::contains("2.7.18"));
}

#[test]
fn outputs_the_catalog_as_json() {
    let fixture = Fixture::new();

    let assert = fixture
        .venvup()
        .args(["versions", "--json"])
        .assert()
        .success();

    let payload: Value = serde_json::from_slice(&assert.get_output().stdout).expect("json output");
    let versions = payload["versions"].as_array().expect("versions array");
    assert_eq!(versions.len(), 6);
    assert_eq!(payload["latest"], "3.12.3");
}

#[test]
fn filters_the_catalog_by_substring() {
    let fixture = Fixture::new();

    let assert = fixture
        .venvup()
        .args(["versions", "--json", "3.9"])
        .assert()
        .success();

    let payload: Value = serde_json::from_slice(&assert.get_output().stdout).expect("json output");
    let versions: Vec<&str> = payload["versions"]
        .as_array()
        .expect("versions array")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(versions, ["3.9", "3.9.18"]);
}

#[test]
fn reports_when_nothing_matches() {
    let fixture = Fixture::new();

    fixture
        .venvup()
        .args(["versions", "4.0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No installable versions matched"));
}

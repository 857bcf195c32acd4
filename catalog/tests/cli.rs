mod common;

use std::fs;

use assert_cmd::Command;
use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// A `catalog` command running in `work_dir`, with collections under `data/`.
fn catalog_cmd(work_dir: &TempDir) -> Command {
    let data = work_dir.path().join("data");
    if !data.exists() {
        fs::create_dir(&data).unwrap();
        common::write_fixtures(&data);
    }
    let mut cmd = cargo_bin_cmd!("catalog");
    cmd.current_dir(work_dir.path());
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

// ============================================================================
// Browsing
// ============================================================================

#[test]
fn courses_filtered_by_grade() {
    let tmp = TempDir::new().unwrap();
    catalog_cmd(&tmp)
        .args(["--data-dir", "data", "courses", "--grade", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Python с нуля"))
        .stdout(predicate::str::contains("1 сентября 2024 — 20 декабря 2024"))
        .stdout(predicate::str::contains("Уровень: начальный"))
        .stdout(predicate::str::contains("Машинное обучение").not());
}

#[test]
fn courses_json_with_subject_and_difficulty() {
    let tmp = TempDir::new().unwrap();
    let output = catalog_cmd(&tmp)
        .args(["--data-dir", "data", "courses", "--json"])
        .args(["--subject", "programming", "--difficulty", "advanced"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let courses = stdout_json(&output.stdout);
    let courses = courses.as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["title"], "Машинное обучение");
    assert_eq!(courses[0]["grades"], serde_json::json!([10]));
}

#[test]
fn taxonomy_listings() {
    let tmp = TempDir::new().unwrap();
    catalog_cmd(&tmp)
        .args(["--data-dir", "data", "subjects"])
        .assert()
        .success()
        .stdout(predicate::str::contains("programming"))
        .stdout(predicate::str::contains("Много практики."));
    catalog_cmd(&tmp)
        .args(["--data-dir", "data", "grades"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8 класс\n9 класс\n10 класс"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn config_file_names_the_source() {
    let tmp = TempDir::new().unwrap();
    let mut cmd = catalog_cmd(&tmp);
    fs::write(tmp.path().join(".catalog.toml"), "data_dir = \"data\"\n").unwrap();
    cmd.arg("difficulties")
        .assert()
        .success()
        .stdout(predicate::str::contains("beginner"))
        .stdout(predicate::str::contains("продвинутый"));
}

#[test]
fn data_dir_flag_overrides_config_file() {
    let tmp = TempDir::new().unwrap();
    let mut broken = catalog_cmd(&tmp);
    fs::write(tmp.path().join(".catalog.toml"), "data_dir = \"nowhere\"\n").unwrap();
    broken
        .arg("subjects")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load subjects"));

    catalog_cmd(&tmp)
        .args(["--data-dir", "data", "subjects"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ai"));
}

#[test]
fn api_url_flag_wins_over_data_dir() {
    let tmp = TempDir::new().unwrap();
    let mut cmd = catalog_cmd(&tmp);
    fs::write(
        tmp.path().join(".catalog.toml"),
        "data_dir = \"data\"\ntimeout_secs = 2\n",
    )
    .unwrap();
    // nothing listens on the discard port
    cmd.args(["--api-url", "http://127.0.0.1:9", "subjects"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load"));
}

#[test]
fn missing_source_is_reported() {
    let tmp = TempDir::new().unwrap();
    catalog_cmd(&tmp)
        .arg("courses")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no data source configured"));
}

#[test]
fn schema_describes_config_file() {
    let tmp = TempDir::new().unwrap();
    let output = catalog_cmd(&tmp).arg("schema").output().unwrap();
    assert!(output.status.success());

    let schema = stdout_json(&output.stdout);
    let properties = schema["properties"].as_object().unwrap();
    for key in ["api_url", "data_dir", "stale_secs", "timeout_secs"] {
        assert!(properties.contains_key(key), "{key} missing from schema");
    }
}

// ============================================================================
// Admin forms
// ============================================================================

/// The record printed after the `Record` heading.
fn printed_record(stdout: &[u8]) -> Value {
    let text = String::from_utf8(stdout.to_vec()).unwrap();
    let (_, record) = text.split_once("Record\n").unwrap();
    serde_json::from_str(record).unwrap()
}

#[test]
fn form_applies_adds_before_sets() {
    let tmp = TempDir::new().unwrap();
    let output = catalog_cmd(&tmp)
        .args(["form", "subject"])
        .args(["--set", "additional_description.1=Соберёте робота."])
        .args(["--add", "additional_description"])
        .args(["--set", "type=robotics", "--set", "color=#ff5722"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let record = printed_record(&output.stdout);
    assert_eq!(record["type"], "robotics");
    assert_eq!(record["color"], "#ff5722");
    assert_eq!(
        record["additional_description"],
        serde_json::json!(["", "Соберёте робота."])
    );
}

#[test]
fn blank_course_form_prints_a_record() {
    let tmp = TempDir::new().unwrap();
    let output = catalog_cmd(&tmp)
        .args(["form", "course", "--set", "title=X"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    assert!(stdout.contains("Add Grade"), "{stdout}");
    let record = printed_record(&output.stdout);
    assert_eq!(record["title"], "X");
    assert_eq!(record["grades"], serde_json::json!([]));
}

#[test]
fn form_loads_existing_record() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("beginner.json"),
        r##"{"type": "beginner", "label": "начальный", "icon": "", "color": "#43a047"}"##,
    )
    .unwrap();
    let output = catalog_cmd(&tmp)
        .args(["form", "difficulty", "--from", "beginner.json"])
        .args(["--set", "label=Начальный"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let record = printed_record(&output.stdout);
    assert_eq!(record["type"], "beginner");
    assert_eq!(record["label"], "Начальный");
}

#[test]
fn form_rejects_malformed_edit() {
    let tmp = TempDir::new().unwrap();
    catalog_cmd(&tmp)
        .args(["form", "subject", "--set", "=value"])
        .assert()
        .failure();
    catalog_cmd(&tmp)
        .args(["form", "subject", "--set", "nope=value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

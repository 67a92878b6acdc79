//! End-to-end runs of `selfexpose scan` against `tests/fixtures/basic`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(deprecated)]
fn selfexpose_cmd() -> Command {
    Command::cargo_bin("selfexpose").expect("selfexpose binary not found")
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("selfexpose-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
}

fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("read json output");
    serde_json::from_str(&text).expect("parse json output")
}

/// Scan the basic fixture, writing every output into `out`.
fn scan_basic(out: &TempDir) -> assert_cmd::assert::Assert {
    let tree = fixtures_dir().join("basic").join("tree");
    selfexpose_cmd()
        .current_dir(out.path())
        .arg("scan")
        .arg(&tree)
        .arg(out.path().join("snapshot.json"))
        .arg("--markdown-out")
        .arg(out.path().join("report.md"))
        .arg("--report-out")
        .arg(out.path().join("report.json"))
        .arg("--graph-out")
        .arg(out.path().join("graph.json"))
        .assert()
}

#[test]
fn snapshot_matches_expected() {
    let out = TempDir::new().expect("temp dir");
    scan_basic(&out)
        .success()
        .stdout(predicate::str::contains("selfexpose: 3 components"))
        .stdout(predicate::str::contains("verdict warn"));

    let actual = read_json(&out.path().join("snapshot.json"));
    let expected = read_json(&fixtures_dir().join("basic").join("expected.snapshot.json"));
    assert_eq!(actual, expected);
}

#[test]
fn snapshot_bytes_are_stable_across_runs() {
    let first = TempDir::new().expect("temp dir");
    let second = TempDir::new().expect("temp dir");
    scan_basic(&first).success();
    scan_basic(&second).success();

    let a = std::fs::read(first.path().join("snapshot.json")).expect("read first");
    let b = std::fs::read(second.path().join("snapshot.json")).expect("read second");
    assert_eq!(a, b);
    assert_eq!(a.last(), Some(&b'\n'));
}

#[test]
fn report_lists_expected_findings() {
    let out = TempDir::new().expect("temp dir");
    scan_basic(&out).success();

    let report = read_json(&out.path().join("report.json"));
    assert_eq!(report["schema"], "selfexpose.report.v1");
    assert_eq!(report["verdict"], "warn");
    assert_eq!(report["data"]["files_considered"], 4);
    assert_eq!(report["data"]["files_with_declarations"], 3);
    assert_eq!(report["data"]["files_missing_declaration"], 1);
    assert_eq!(report["data"]["stats"]["has_cycle"], true);

    let findings = report["findings"].as_array().expect("findings array");
    let codes: BTreeSet<&str> = findings
        .iter()
        .filter_map(|f| f["code"].as_str())
        .collect();
    for code in [
        "dependency_cycle",
        "undefined_dependency",
        "invalid_version",
        "duplicate_capability",
        "missing_declaration",
        "incomplete_declaration",
    ] {
        assert!(codes.contains(code), "missing {code} in {codes:?}");
    }

    let invalid_versions = findings
        .iter()
        .filter(|f| f["code"] == "invalid_version")
        .count();
    assert_eq!(invalid_versions, 2);

    let undefined = findings
        .iter()
        .find(|f| f["code"] == "undefined_dependency")
        .expect("undefined dependency finding");
    assert_eq!(undefined["data"]["dependent"], "agent_manager");
    assert_eq!(undefined["data"]["missing"], "memory");

    let incomplete = findings
        .iter()
        .find(|f| f["code"] == "incomplete_declaration")
        .expect("incomplete declaration finding");
    assert_eq!(incomplete["severity"], "info");
    assert_eq!(incomplete["data"]["id"], "base_agent");
    assert_eq!(incomplete["data"]["missing"], serde_json::json!(["kind"]));

    let missing = findings
        .iter()
        .find(|f| f["code"] == "missing_declaration")
        .expect("missing declaration finding");
    assert!(
        missing["data"]["scaffold"]
            .as_str()
            .is_some_and(|s| s.starts_with("# @self-expose: {\"id\": \"helpers\""))
    );
}

#[test]
fn report_validates_against_generated_schema() {
    let out = TempDir::new().expect("temp dir");
    scan_basic(&out).success();

    let schema = schemars::schema_for!(selfexpose_types::ExposureReport);
    let schema = serde_json::to_value(&schema).expect("schema to json");
    let validator = jsonschema::validator_for(&schema).expect("compile schema");

    let report = read_json(&out.path().join("report.json"));
    let errors: Vec<String> = validator.iter_errors(&report).map(|e| e.to_string()).collect();
    assert!(errors.is_empty(), "schema errors: {errors:?}");
}

#[test]
fn normalized_reports_match_across_runs() {
    let first = TempDir::new().expect("temp dir");
    let second = TempDir::new().expect("temp dir");
    scan_basic(&first).success();
    scan_basic(&second).success();

    let a = selfexpose_test_util::normalize_nondeterministic(read_json(
        &first.path().join("report.json"),
    ));
    let b = selfexpose_test_util::normalize_nondeterministic(read_json(
        &second.path().join("report.json"),
    ));
    assert_eq!(a, b);
    assert_eq!(a["started_at"], selfexpose_test_util::TIMESTAMP_PLACEHOLDER);
}

#[test]
fn markdown_report_is_written() {
    let out = TempDir::new().expect("temp dir");
    scan_basic(&out).success();

    let md = std::fs::read_to_string(out.path().join("report.md")).expect("read markdown");
    assert!(md.starts_with("# Self-exposure compatibility report"));
    assert!(md.contains("## Findings"));
    assert!(md.contains("dependency_cycle"));
}

#[test]
fn graph_has_component_nodes() {
    let out = TempDir::new().expect("temp dir");
    scan_basic(&out).success();

    let graph = read_json(&out.path().join("graph.json"));
    assert_eq!(graph["metadata"]["components"], 3);
    let ids: BTreeSet<&str> = graph["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .filter_map(|n| n["id"].as_str())
        .collect();
    assert!(ids.contains("agent_manager"));
    assert!(ids.contains("dashboard"));
}

#[test]
fn md_rerenders_saved_report() {
    let out = TempDir::new().expect("temp dir");
    scan_basic(&out).success();

    let original = std::fs::read_to_string(out.path().join("report.md")).expect("read markdown");
    selfexpose_cmd()
        .arg("md")
        .arg("--report")
        .arg(out.path().join("report.json"))
        .assert()
        .success()
        .stdout(original);
}

#[test]
fn default_outputs_land_in_working_directory() {
    let out = TempDir::new().expect("temp dir");
    selfexpose_cmd()
        .current_dir(out.path())
        .arg("scan")
        .arg(fixtures_dir().join("basic").join("tree"))
        .assert()
        .success();

    assert!(out.path().join("self_exposures.json").is_file());
    assert!(out.path().join("self_exposure_report.md").is_file());
}

#[test]
fn empty_tree_writes_empty_snapshot() {
    let tree = TempDir::new().expect("temp dir");
    let out = TempDir::new().expect("temp dir");
    selfexpose_cmd()
        .current_dir(out.path())
        .arg("scan")
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("verdict pass"));

    let snapshot =
        std::fs::read_to_string(out.path().join("self_exposures.json")).expect("read snapshot");
    assert_eq!(snapshot, "[]\n");
}

#[test]
fn missing_root_is_fatal() {
    let out = TempDir::new().expect("temp dir");
    selfexpose_cmd()
        .current_dir(out.path())
        .arg("scan")
        .arg(out.path().join("does-not-exist"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("selfexpose error"));
}

#[test]
fn every_file_failing_is_fatal() {
    let tree = TempDir::new().expect("temp dir");
    std::fs::write(tree.path().join("broken.py"), "# @self-expose: {id: nope,}\n")
        .expect("write broken file");
    let out = TempDir::new().expect("temp dir");
    selfexpose_cmd()
        .current_dir(out.path())
        .arg("scan")
        .arg(tree.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no declaration could be extracted"));
}

#[test]
fn explicit_missing_config_is_an_error() {
    let out = TempDir::new().expect("temp dir");
    selfexpose_cmd()
        .current_dir(out.path())
        .arg("--config")
        .arg(out.path().join("absent.toml"))
        .arg("scan")
        .arg(fixtures_dir().join("basic").join("tree"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("read config"));
}

#[test]
fn config_can_disable_a_check() {
    let out = TempDir::new().expect("temp dir");
    let config = out.path().join("selfexpose.toml");
    std::fs::write(&config, "[checks.\"records.version_format\"]\nenabled = false\n")
        .expect("write config");

    selfexpose_cmd()
        .current_dir(out.path())
        .arg("--config")
        .arg(&config)
        .arg("scan")
        .arg(fixtures_dir().join("basic").join("tree"))
        .arg("--report-out")
        .arg(out.path().join("report.json"))
        .assert()
        .success();

    let report = read_json(&out.path().join("report.json"));
    let findings = report["findings"].as_array().expect("findings array");
    assert!(findings.iter().all(|f| f["code"] != "invalid_version"));
}

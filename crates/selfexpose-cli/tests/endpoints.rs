use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn selfexpose_cmd() -> Command {
    Command::cargo_bin("selfexpose").expect("selfexpose binary not found")
}

fn endpoints_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .join("tests")
        .join("fixtures")
        .join("endpoints")
}

#[test]
fn reports_routes_never_called() {
    let out = TempDir::new().expect("temp dir");
    let fixture = endpoints_fixture();
    let report_path = out.path().join("endpoints.json");

    selfexpose_cmd()
        .current_dir(out.path())
        .arg("endpoints")
        .arg("--frontend")
        .arg(fixture.join("web"))
        .arg("--backend")
        .arg(fixture.join("server"))
        .arg("--report-out")
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Endpoint reconciliation report"))
        .stdout(predicate::str::contains("/api/health"));

    let text = std::fs::read_to_string(&report_path).expect("read report");
    let report: Value = serde_json::from_str(&text).expect("parse report");
    assert_eq!(report["schema"], "selfexpose.endpoints.v1");
    assert_eq!(report["data"]["frontend_files"], 1);
    assert_eq!(report["data"]["backend_files"], 1);

    let unused: Vec<&str> = report["data"]["diff"]["missing_in_frontend"]
        .as_array()
        .expect("missing_in_frontend array")
        .iter()
        .filter_map(|e| e["path"].as_str())
        .collect();
    assert!(unused.contains(&"/api/health"));
    assert!(!unused.contains(&"/api/status"));

    let missing: Vec<&str> = report["data"]["diff"]["missing_in_backend"]
        .as_array()
        .expect("missing_in_backend array")
        .iter()
        .filter_map(|e| e["path"].as_str())
        .collect();
    assert!(!missing.contains(&"/api/status"));
    assert!(!missing.contains(&"/api/chat"));
}

#[test]
fn markdown_can_go_to_a_file() {
    let out = TempDir::new().expect("temp dir");
    let fixture = endpoints_fixture();
    let md_path = out.path().join("endpoints.md");

    selfexpose_cmd()
        .current_dir(out.path())
        .arg("endpoints")
        .arg("--frontend")
        .arg(fixture.join("web"))
        .arg("--backend")
        .arg(fixture.join("server"))
        .arg("--markdown-out")
        .arg(&md_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let md = std::fs::read_to_string(&md_path).expect("read markdown");
    assert!(md.contains("Served but never called"));
}

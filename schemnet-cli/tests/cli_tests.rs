//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the schemnet binary (finds it in target/debug when run via cargo test).
fn schemnet_cli() -> Command {
    cargo_bin_cmd!("schemnet")
}

/// Path to schemnet library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("schemnet")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = schemnet_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("netlist"));
}

#[test]
fn test_cli_version() {
    let mut cmd = schemnet_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_extract_human() {
    let mut cmd = schemnet_cli();
    let path = fixtures_dir().join("valid").join("inverter.sch.json");

    cmd.arg("extract").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("inp (INPUT)"))
        .stdout(predicate::str::contains("d -> out"))
        .stdout(predicate::str::contains("Connections: 8"));
}

#[test]
fn test_cli_extract_circuit_output() {
    let mut cmd = schemnet_cli();
    let path = fixtures_dir().join("valid").join("series_out.sch.json");

    cmd.arg("extract").arg(path).arg("--format").arg("circuit");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["signals"][0]["name"], "out");
    assert_eq!(value["signals"][0]["portdir"], "OUTPUT");
    assert_eq!(value["instances"][0]["conns"][1]["signame"], "out");
}

#[test]
fn test_cli_extract_json_output() {
    let mut cmd = schemnet_cli();
    let path = fixtures_dir().join("valid").join("inverter.sch.json");

    cmd.arg("extract").arg(path).arg("-f").arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"results\""))
        .stdout(predicate::str::contains("\"timestamp\""))
        .stdout(predicate::str::contains("\"total_instances\": 2"));
}

#[test]
fn test_cli_extract_failure_names_instance() {
    let mut cmd = schemnet_cli();
    let path = fixtures_dir().join("invalid").join("unresolved_instance_port.sch.json");

    cmd.arg("extract").arg(path);

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Port n on Instance r1"));
}

#[test]
fn test_cli_extract_nonexistent_file() {
    let mut cmd = schemnet_cli();

    cmd.arg("extract").arg("does_not_exist.sch.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_fail_on_warning() {
    let path = fixtures_dir().join("valid").join("tee.sch.json");

    let mut cmd = schemnet_cli();
    cmd.arg("extract").arg(&path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Junction dot missing at (100, 0)"));

    let mut cmd = schemnet_cli();
    cmd.arg("extract").arg(&path).arg("--fail-on-warning");
    cmd.assert().code(1);

    let mut cmd = schemnet_cli();
    cmd.arg("extract")
        .arg(fixtures_dir().join("valid").join("inverter.sch.json"))
        .arg("--fail-on-warning");
    cmd.assert().code(0);
}

#[test]
fn test_cli_strict_dots() {
    let path = fixtures_dir().join("valid").join("tee.sch.json");

    let mut cmd = schemnet_cli();
    cmd.arg("extract").arg(&path).arg("--strict-dots");
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Junction dots do not match"));

    let mut cmd = schemnet_cli();
    cmd.arg("extract").arg(&path).arg("--no-dot-check");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Junction dot").not());
}

#[test]
fn test_cli_dots_command() {
    let mut cmd = schemnet_cli();
    cmd.arg("dots").arg(fixtures_dir().join("valid").join("tee.sch.json"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Inferred dots: 1"))
        .stdout(predicate::str::contains("(100, 0)"));

    let mut cmd = schemnet_cli();
    cmd.arg("dots")
        .arg(fixtures_dir().join("valid").join("tee.sch.json"))
        .arg("--strict-dots");
    cmd.assert().code(1);

    let mut cmd = schemnet_cli();
    cmd.arg("dots")
        .arg(fixtures_dir().join("valid").join("inverter.sch.json"))
        .arg("--strict-dots");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Saved dots match"));
}

#[test]
fn test_cli_project_command() {
    let mut cmd = schemnet_cli();

    cmd.arg("project").arg(fixtures_dir().join("valid"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("inverter.sch.json"))
        .stdout(predicate::str::contains("series_out.sch.json"));
}

#[test]
fn test_cli_project_with_failure() {
    let mut cmd = schemnet_cli();

    cmd.arg("project").arg(fixtures_dir().join("invalid"));

    cmd.assert().code(1);
}

#[test]
fn test_cli_allow_duplicate_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dup.sch.json");
    std::fs::write(
        &path,
        r#"{
            "name": "dup",
            "instances": [
                { "name": "r0", "of": "Res(r=1)", "kind": "Res", "loc": { "x": 0, "y": 0 } },
                { "name": "r0", "of": "Res(r=2)", "kind": "Res", "loc": { "x": 0, "y": 0 } }
            ],
            "wires": [{ "points": [{ "x": 0, "y": 0 }, { "x": 0, "y": 100 }] }]
        }"#,
    )
    .unwrap();

    let mut cmd = schemnet_cli();
    cmd.arg("extract").arg(&path);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Duplicate instance name: r0"));

    let mut cmd = schemnet_cli();
    cmd.arg("extract")
        .arg(&path)
        .arg("--allow-duplicate-instances")
        .arg("--no-dot-check");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("r0 = Res(r=2)"));
}

#[test]
fn test_cli_custom_library() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty_lib.json");
    std::fs::write(&path, r#"{ "elements": [], "port_elements": [] }"#).unwrap();

    let mut cmd = schemnet_cli();
    cmd.arg("extract")
        .arg(fixtures_dir().join("valid").join("series_out.sch.json"))
        .arg("--library")
        .arg(&path);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("not in the element library"));
}

#[test]
fn test_cli_elements_command() {
    let mut cmd = schemnet_cli();

    cmd.arg("elements");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Nmos (nmos)"))
        .stdout(predicate::str::contains("Default name: inp"));
}

#[test]
fn test_cli_elements_verbose() {
    let mut cmd = schemnet_cli();

    cmd.arg("elements").arg("--verbose");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("port g at (-70, 50)"));
}

#[test]
fn test_cli_output_formats_are_different() {
    let path = fixtures_dir().join("valid").join("inverter.sch.json");

    let mut cmd_human = schemnet_cli();
    cmd_human.arg("extract").arg(&path).arg("--format").arg("human");
    let human_output = cmd_human.output().unwrap();

    let mut cmd_json = schemnet_cli();
    cmd_json.arg("extract").arg(&path).arg("--format").arg("json");
    let json_output = cmd_json.output().unwrap();

    assert_ne!(
        human_output.stdout,
        json_output.stdout,
        "Different formats should produce different output"
    );
}

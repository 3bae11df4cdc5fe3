//! Integration tests for the onmsq CLI.

use std::process::{Command, Output};
use tempfile::TempDir;

const PROPERTIES: &str = r#"{"searchProperty": [
    {"id": "alarmAckTime", "name": "Acknowledged Time", "orderBy": true, "type": "TIMESTAMP"},
    {"id": "uei", "name": "UEI", "orderBy": true, "type": "STRING"},
    {"id": "severity", "name": "Severity", "orderBy": true, "type": "INTEGER",
     "values": {"5": "MINOR", "6": "MAJOR"}}
]}"#;

fn onmsq_cmd(root: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_onmsq"));
    cmd.env("ONMS_ROOT", root);
    cmd.env_remove("ONMSQ_LOG");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(root: &std::path::Path, args: &[&str]) -> Output {
    onmsq_cmd(root).args(args).output().expect("failed to run onmsq")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn init_server(root: &std::path::Path, version: &str) {
    let output = run(root, &["init", "--server-version", version]);
    assert!(output.status.success(), "onmsq init failed: {:?}", output);
}

#[test]
fn test_init_writes_config() {
    let tmp = TempDir::new().unwrap();
    init_server(tmp.path(), "21.0.1");

    let contents = std::fs::read_to_string(tmp.path().join("config.toml")).unwrap();
    assert!(contents.contains("21.0.1"));

    let output = run(tmp.path(), &["config"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("api:               v2"));
    assert!(out.contains("type:              horizon"));
}

#[test]
fn test_init_rejects_bad_version() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["init", "--server-version", "banana"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid server version"));
    assert!(!tmp.path().join("config.toml").exists());
}

#[test]
fn test_init_keeps_saved_options() {
    let tmp = TempDir::new().unwrap();
    let output = run(
        tmp.path(),
        &["init", "--url", "https://nms.example/opennms", "--server-version", "21.0.0", "-t", "meridian"],
    );
    assert!(output.status.success(), "{:?}", output);

    init_server(tmp.path(), "22.0.0");

    let contents = std::fs::read_to_string(tmp.path().join("config.toml")).unwrap();
    assert!(contents.contains("https://nms.example/opennms"));
    assert!(contents.contains("server_type = \"meridian\""));
    assert!(contents.contains("22.0.0"));
}

#[test]
fn test_compile_requires_config_or_api() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["compile", "id", "eq", "1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No server configured"));

    let output = run(tmp.path(), &["compile", "--api", "2", "id", "eq", "1"]);
    assert!(output.status.success(), "{:?}", output);
    assert!(stdout(&output).contains("_s=id==1"));
}

#[test]
fn test_compile_value_with_parens() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["compile", "--api", "2", "uei", "eq", "foo(bar)"]);
    assert!(output.status.success(), "{:?}", output);
    assert!(stdout(&output).contains("_s=uei==foo(bar)"));
}

#[test]
fn test_compile_v2_nested() {
    let tmp = TempDir::new().unwrap();
    init_server(tmp.path(), "21.0.0");

    let output = run(
        tmp.path(),
        &["compile", "id", "ne", "0", "and", "(severity", "eq", "MINOR", "or", "uei", "like", "*x)"],
    );
    assert!(output.status.success(), "{:?}", output);
    let out = stdout(&output);
    assert!(out.contains("limit=1000"));
    assert!(out.contains("_s=id!=0;(severity==5,uei==*x)"));
}

#[test]
fn test_compile_v1_from_configured_version() {
    let tmp = TempDir::new().unwrap();
    init_server(tmp.path(), "20.1.0");

    let output = run(tmp.path(), &["compile", "severity", "eq", "MINOR", "or", "id", "eq", "3"]);
    assert!(output.status.success(), "{:?}", output);
    let out = stdout(&output);
    assert!(out.contains("comparator=eq"));
    assert!(out.contains("severity=MINOR"));
    assert!(out.contains("id=3"));
}

#[test]
fn test_compile_v1_rejects_and() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["compile", "--api", "1", "id", "eq", "1", "and", "id", "eq", "2"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("OR"));
}

#[test]
fn test_compile_typed_null_with_properties() {
    let tmp = TempDir::new().unwrap();
    let props = tmp.path().join("alarms.json");
    std::fs::write(&props, PROPERTIES).unwrap();

    let output = run(
        tmp.path(),
        &["compile", "--api", "2", "--properties", props.to_str().unwrap(), "alarmAckTime", "eq", "null"],
    );
    assert!(output.status.success(), "{:?}", output);
    assert!(stdout(&output).contains("_s=alarmAckTime==1970-01-01T00%3A00%3A00.000%2B0000"));
}

#[test]
fn test_compile_json_output() {
    let tmp = TempDir::new().unwrap();
    let output = run(
        tmp.path(),
        &[
            "compile", "--api", "2", "--format", "json", "--order-by", "id:desc", "--order-by", "uei:desc",
            "id", "notnull",
        ],
    );
    assert!(output.status.success(), "{:?}", output);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["limit"], "1000");
    assert_eq!(json["_s"], "id!=\u{0000}");
    assert_eq!(json["order"], "DESC");
    assert_eq!(json["orderBy"], serde_json::json!(["id", "uei"]));
}

#[test]
fn test_compile_mixed_order_fails() {
    let tmp = TempDir::new().unwrap();
    let output = run(
        tmp.path(),
        &["compile", "--api", "2", "--order-by", "id:asc", "--order-by", "uei:desc", "id", "eq", "1"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("mixed sort directions"));
}

#[test]
fn test_properties_listing() {
    let tmp = TempDir::new().unwrap();
    let props = tmp.path().join("alarms.json");
    std::fs::write(&props, PROPERTIES).unwrap();

    let output = run(tmp.path(), &["properties", props.to_str().unwrap()]);
    assert!(output.status.success(), "{:?}", output);
    let out = stdout(&output);
    assert!(out.contains("alarmAckTime"));
    assert!(out.contains("TIMESTAMP"));
    assert!(out.contains("5 = MINOR"));

    let output = run(tmp.path(), &["properties", props.to_str().unwrap(), "--attribute", "missing"]);
    assert!(!output.status.success());
}

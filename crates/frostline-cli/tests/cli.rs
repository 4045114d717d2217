#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

const POLICY_YAML: &str = r#"
name: policy_name
database: database_name
schema: schema_name
signature:
  - name: val
    type: VARCHAR
return_data_type: VARCHAR
masking_expression: case when current_role() in ('ANALYST') then val else sha2(val, 512) end
comment: great comment
"#;

fn frostline() -> Command {
    let mut cmd = Command::cargo_bin("frostline").unwrap();
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_render_masking_policy() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("policy.yaml");
    fs::write(&file, POLICY_YAML).unwrap();

    frostline()
        .args(["render", "masking_policy"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "CREATE MASKING POLICY \"database_name\".\"schema_name\".\"policy_name\" AS (VAL VARCHAR) RETURNS VARCHAR -> case when",
        ))
        .stdout(predicate::str::contains("COMMENT = 'great comment'"));
}

#[test]
fn test_render_account_redacts_password() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("account.yaml");
    fs::write(
        &file,
        "name: acme\nadmin_name: root\nadmin_password: hunter2hunter2\nemail: root@acme.io\nedition: STANDARD\n",
    )
    .unwrap();

    frostline()
        .args(["render", "account"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("ADMIN_PASSWORD = '[REDACTED]'"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_render_rejects_invalid_attributes() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("policy.yaml");
    fs::write(&file, POLICY_YAML.replace("type: VARCHAR", "type: NOPE")).unwrap();

    frostline()
        .args(["render", "masking_policy"])
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("fatal:"));
}

#[test]
fn test_unknown_kind() {
    frostline()
        .args(["render", "warehouse", "x.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("masking_policy"));
}

#[test]
fn test_plan_create_then_noop() {
    let dir = tempdir().unwrap();
    let desired = dir.path().join("policy.yaml");
    fs::write(&desired, POLICY_YAML).unwrap();

    let output = frostline()
        .args(["plan", "masking_policy", "--desired"])
        .arg(&desired)
        .output()
        .unwrap();
    assert!(output.status.success());
    let plan: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["action"], "create");

    let state = dir.path().join("state.json");
    fs::write(
        &state,
        r#"{
          "id": "database_name|schema_name|policy_name",
          "schema_version": 1,
          "attributes": {
            "name": "policy_name",
            "database": "database_name",
            "schema": "schema_name",
            "signature": [{"name": "val", "type": "VARCHAR"}],
            "return_data_type": "VARCHAR",
            "masking_expression": "case when current_role() in ('ANALYST') then val else sha2(val, 512) end",
            "comment": "great comment",
            "exempt_other_policies": false,
            "fully_qualified_name": "\"database_name\".\"schema_name\".\"policy_name\""
          },
          "computed": ["fully_qualified_name"]
        }"#,
    )
    .unwrap();

    frostline()
        .args(["plan", "masking_policy", "--detailed-exitcode", "--desired"])
        .arg(&desired)
        .arg("--state")
        .arg(&state)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"no_op\""));
}

#[test]
fn test_plan_detailed_exitcode_on_replace() {
    let dir = tempdir().unwrap();
    let desired = dir.path().join("tag.yaml");
    fs::write(
        &desired,
        "tag_id: tag_db|tag_schema|tag_name\nmasking_policy_id: mp_db|mp_schema|other\n",
    )
    .unwrap();
    let state = dir.path().join("state.json");
    fs::write(
        &state,
        r#"{"id": "tag_db|tag_schema|tag_name|mp_db|mp_schema|mp_name",
            "attributes": {"tag_id": "tag_db|tag_schema|tag_name", "masking_policy_id": "mp_db|mp_schema|mp_name"}}"#,
    )
    .unwrap();

    frostline()
        .args(["plan", "tag_masking_policy_association", "--detailed-exitcode"])
        .arg("--desired")
        .arg(&desired)
        .arg("--state")
        .arg(&state)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"replace\""));
}

#[test]
fn test_upgrade_state() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("state.json");
    fs::write(
        &file,
        r#"{"id": "DB|SCH|P", "schema_version": 0, "attributes": {"qualified_name": "DB.SCH.P"}}"#,
    )
    .unwrap();

    let output = frostline()
        .args(["upgrade-state", "masking_policy"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let state: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["schema_version"], 1);
    assert_eq!(state["attributes"]["fully_qualified_name"], "\"DB\".\"SCH\".\"P\"");
    assert!(state["attributes"].get("qualified_name").is_none());
}

#[test]
fn test_upgrade_rejects_future_state() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("state.json");
    fs::write(&file, r#"{"id": "DB|SCH|P", "schema_version": 5}"#).unwrap();

    frostline()
        .args(["upgrade-state", "masking_policy"])
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("newer than supported"));
}

#[test]
fn test_kinds() {
    frostline()
        .arg("kinds")
        .assert()
        .success()
        .stdout(predicate::str::contains("table_column_masking_policy_application"));
}

fn resolved_config(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_config_from_environment() {
    let mut cmd = frostline();
    cmd.arg("config")
        .env("FROSTLINE_DROP_IF_EXISTS", "1")
        .env("FROSTLINE_QUERY_TIMEOUT", "45")
        .env("FROSTLINE_LOG_STATEMENTS", "false");
    let config = resolved_config(&mut cmd);
    assert_eq!(config["drop_if_exists"], true);
    assert_eq!(config["query_timeout_secs"], 45);
    assert_eq!(config["log_statements"], false);
}

#[test]
fn test_config_defaults_without_environment() {
    let mut cmd = frostline();
    cmd.arg("config")
        .env_remove("FROSTLINE_DROP_IF_EXISTS")
        .env_remove("FROSTLINE_QUERY_TIMEOUT")
        .env_remove("FROSTLINE_LOG_STATEMENTS");
    let config = resolved_config(&mut cmd);
    assert_eq!(config["drop_if_exists"], false);
    assert_eq!(config["query_timeout_secs"], 600);
    assert_eq!(config["log_statements"], true);
}

#[test]
fn test_config_from_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("provider.yaml");
    fs::write(&file, "drop_if_exists: true\nquery_timeout_secs: 0\n").unwrap();

    let mut cmd = frostline();
    cmd.args(["config", "--file"]).arg(&file);
    let config = resolved_config(&mut cmd);
    assert_eq!(config["drop_if_exists"], true);
    assert_eq!(config["query_timeout_secs"], 0);

    fs::write(&file, "drop_if_exists: [").unwrap();
    frostline()
        .args(["config", "--file"])
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid provider configuration"));
}

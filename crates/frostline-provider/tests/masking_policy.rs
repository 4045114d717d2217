use std::sync::Arc;

use frostline_catalog::testing::ScriptedHandle;
use frostline_catalog::{RemoteError, Row};
use frostline_core::{AttributeMap, ErrorKind, ProviderConfig, StateEnvelope};
use frostline_provider::{PlanAction, Provider, ResourceKind};
use serde_json::{json, Value};

const KIND: ResourceKind = ResourceKind::MaskingPolicy;
const BODY: &str = "case when current_role() in ('ANALYST') then val else sha2(val, 512) end";

fn map(value: Value) -> AttributeMap {
    value.as_object().cloned().unwrap()
}

fn s1_config() -> AttributeMap {
    map(json!({
        "name": "policy_name",
        "database": "database_name",
        "schema": "schema_name",
        "signature": [{"name": "val", "type": "VARCHAR"}],
        "return_data_type": "VARCHAR",
        "masking_expression": BODY,
        "comment": "great comment"
    }))
}

fn show_row(db: &str, schema: &str, name: &str, comment: &str) -> Row {
    Row::new()
        .with("created_on", "2024-01-01 00:00:00.000 -0800")
        .with("name", name)
        .with("database_name", db)
        .with("schema_name", schema)
        .with("kind", "MASKING_POLICY")
        .with("owner", "ACCOUNTADMIN")
        .with("comment", comment)
        .with("options", "")
}

fn describe_row(name: &str, body: &str) -> Row {
    Row::new()
        .with("name", name)
        .with("signature", "(VAL VARCHAR)")
        .with("return_type", "VARCHAR(16777216)")
        .with("body", body)
}

fn provider(handle: &Arc<ScriptedHandle>) -> Provider {
    Provider::new(handle.clone(), ProviderConfig::default())
}

fn existing(name: &str, comment: &str) -> StateEnvelope {
    let mut attrs = s1_config();
    attrs.insert("name".to_string(), json!(name));
    attrs.insert("comment".to_string(), json!(comment));
    attrs.insert("database".to_string(), json!("db"));
    attrs.insert("schema".to_string(), json!("sch"));
    StateEnvelope::new(format!("db|sch|{name}"), 1, attrs)
}

#[tokio::test]
async fn test_create_emits_exact_statement_and_reads_back() {
    let handle = Arc::new(ScriptedHandle::new());
    handle
        .on_query(
            "SHOW MASKING POLICIES",
            vec![show_row("database_name", "schema_name", "policy_name", "great comment")],
        )
        .on_query("DESCRIBE MASKING POLICY", vec![describe_row("policy_name", BODY)]);

    let state = provider(&handle)
        .create(KIND, s1_config())
        .await
        .into_result()
        .unwrap();

    assert_eq!(
        handle.executed(),
        vec![format!(
            "CREATE MASKING POLICY \"database_name\".\"schema_name\".\"policy_name\" AS (VAL VARCHAR) RETURNS VARCHAR -> {BODY} COMMENT = 'great comment'"
        )]
    );
    assert_eq!(state.id, "database_name|schema_name|policy_name");
    assert_eq!(state.schema_version, 1);
    assert_eq!(
        state.get_str("fully_qualified_name"),
        Some("\"database_name\".\"schema_name\".\"policy_name\"")
    );
    assert!(state.computed.contains("fully_qualified_name"));
}

#[tokio::test]
async fn test_state_after_create_matches_remote_and_plans_clean() {
    let handle = Arc::new(ScriptedHandle::new());
    handle
        .on_query(
            "SHOW MASKING POLICIES",
            vec![show_row("database_name", "schema_name", "policy_name", "great comment")],
        )
        .on_query("DESCRIBE MASKING POLICY", vec![describe_row("policy_name", BODY)]);
    let state = provider(&handle)
        .create(KIND, s1_config())
        .await
        .into_result()
        .unwrap();

    assert_eq!(state.get_str("name"), Some("policy_name"));
    assert_eq!(state.get_str("comment"), Some("great comment"));
    assert_eq!(state.get_str("masking_expression"), Some(BODY));
    assert_eq!(state.attributes["signature"], json!([{"name": "VAL", "type": "VARCHAR"}]));
    assert_eq!(state.attributes["exempt_other_policies"], json!(false));
    // Equivalent to the remote's VARCHAR(16777216), so the configured spelling stays.
    assert_eq!(state.get_str("return_data_type"), Some("VARCHAR"));

    let plan = Provider::plan(KIND, Some(&state), &s1_config()).unwrap();
    assert_eq!(plan.action, PlanAction::NoOp, "{plan:?}");
}

#[tokio::test]
async fn test_empty_comment_plans_clean_after_create() {
    let handle = Arc::new(ScriptedHandle::new());
    handle
        .on_query(
            "SHOW MASKING POLICIES",
            vec![show_row("database_name", "schema_name", "policy_name", "")],
        )
        .on_query("DESCRIBE MASKING POLICY", vec![describe_row("policy_name", BODY)]);
    let mut config = s1_config();
    config.insert("comment".to_string(), json!(""));

    let state = provider(&handle)
        .create(KIND, config.clone())
        .await
        .into_result()
        .unwrap();
    assert!(!handle.executed()[0].contains("COMMENT"));

    let plan = Provider::plan(KIND, Some(&state), &config).unwrap();
    assert_eq!(plan.action, PlanAction::NoOp, "{plan:?}");
    config.remove("comment");
    let plan = Provider::plan(KIND, Some(&state), &config).unwrap();
    assert_eq!(plan.action, PlanAction::NoOp, "{plan:?}");
}

#[tokio::test]
async fn test_blank_comment_update_dispatches_nothing() {
    let handle = Arc::new(ScriptedHandle::new());
    handle
        .on_query("SHOW MASKING POLICIES", vec![show_row("db", "sch", "A", "")])
        .on_query("DESCRIBE MASKING POLICY", vec![describe_row("A", BODY)]);
    let prior = existing("A", "");
    let mut desired = prior.attributes.clone();
    desired.remove("comment");

    provider(&handle)
        .update(KIND, &prior, desired)
        .await
        .into_result()
        .unwrap();
    assert!(handle.executed().is_empty(), "{:?}", handle.executed());
}

#[tokio::test]
async fn test_drop_statement_and_cleared_id() {
    let handle = Arc::new(ScriptedHandle::new());
    let state = StateEnvelope::new("database_name|schema_name|policy_name", 1, s1_config());

    let after = provider(&handle)
        .delete(KIND, &state)
        .await
        .into_result()
        .unwrap();

    assert_eq!(
        handle.executed(),
        vec![r#"DROP MASKING POLICY "database_name"."schema_name"."policy_name""#]
    );
    assert!(after.is_absent());
}

#[tokio::test]
async fn test_delete_twice_is_idempotent() {
    let handle = Arc::new(ScriptedHandle::new());
    let state = StateEnvelope::new("database_name|schema_name|policy_name", 1, s1_config());
    let provider = provider(&handle);

    let first = provider.delete(KIND, &state).await;
    assert!(first.error.is_none());

    handle.fail(
        "DROP MASKING POLICY",
        RemoteError::does_not_exist("Masking policy 'POLICY_NAME'"),
    );
    let second = provider.delete(KIND, &state).await;
    assert!(second.error.is_none());
    assert!(second.state.is_absent());
    assert_eq!(handle.executed().len(), 2);
}

#[tokio::test]
async fn test_rename_then_comment() {
    let handle = Arc::new(ScriptedHandle::new());
    handle
        .on_query("SHOW MASKING POLICIES", vec![show_row("db", "sch", "B", "c2")])
        .on_query("DESCRIBE MASKING POLICY", vec![describe_row("B", BODY)]);

    let mut config = existing("B", "c2").attributes;
    config.remove("fully_qualified_name");
    let state = provider(&handle)
        .update(KIND, &existing("A", "c1"), config)
        .await
        .into_result()
        .unwrap();

    assert_eq!(
        handle.executed(),
        vec![
            r#"ALTER MASKING POLICY "db"."sch"."A" RENAME TO "db"."sch"."B""#,
            r#"ALTER MASKING POLICY "db"."sch"."B" SET COMMENT = 'c2'"#,
        ]
    );
    assert_eq!(state.id, "db|sch|B");
    assert_eq!(state.get_str("name"), Some("B"));
    assert_eq!(state.get_str("comment"), Some("c2"));
    assert!(handle
        .queried()
        .iter()
        .all(|q| q.contains("'B'") || q.contains("\"B\"")));
}

#[tokio::test]
async fn test_body_change_ignores_surrounding_whitespace() {
    let handle = Arc::new(ScriptedHandle::new());
    handle
        .on_query("SHOW MASKING POLICIES", vec![show_row("db", "sch", "A", "c1")])
        .on_query("DESCRIBE MASKING POLICY", vec![describe_row("A", BODY)]);

    let mut config = existing("A", "c1").attributes;
    config.insert("masking_expression".to_string(), json!(format!("\n   {BODY}   \n")));
    provider(&handle)
        .update(KIND, &existing("A", "c1"), config)
        .await
        .into_result()
        .unwrap();
    assert!(handle.executed().is_empty());
}

#[tokio::test]
async fn test_unset_comment() {
    let handle = Arc::new(ScriptedHandle::new());
    handle
        .on_query("SHOW MASKING POLICIES", vec![show_row("db", "sch", "A", "")])
        .on_query("DESCRIBE MASKING POLICY", vec![describe_row("A", BODY)]);

    let mut config = existing("A", "c1").attributes;
    config.remove("comment");
    let state = provider(&handle)
        .update(KIND, &existing("A", "c1"), config)
        .await
        .into_result()
        .unwrap();
    assert_eq!(
        handle.executed(),
        vec![r#"ALTER MASKING POLICY "db"."sch"."A" UNSET COMMENT"#]
    );
    assert_eq!(state.attributes["comment"], Value::Null);
}

#[tokio::test]
async fn test_failed_body_change_keeps_new_id_and_old_body() {
    let handle = Arc::new(ScriptedHandle::new());
    handle.fail(
        "ALTER MASKING POLICY \"db\".\"sch\".\"B\" SET BODY",
        RemoteError::new("SQL compilation error: syntax error").with_code("001003"),
    );

    let mut config = existing("B", "c1").attributes;
    config.insert("masking_expression".to_string(), json!("broken ("));
    let outcome = provider(&handle)
        .update(KIND, &existing("A", "c1"), config)
        .await;

    let err = outcome.error.clone().unwrap();
    assert_eq!(err.kind(), ErrorKind::RemoteExecution);
    assert_eq!(outcome.state.id, "db|sch|B");
    assert_eq!(outcome.state.get_str("name"), Some("B"));
    assert_eq!(outcome.state.get_str("masking_expression"), Some(BODY));
    assert_eq!(outcome.diagnostics().len(), 1);
    assert!(outcome.diagnostics()[0].is_error());
}

#[tokio::test]
async fn test_read_clears_state_when_gone() {
    let handle = Arc::new(ScriptedHandle::new());
    let outcome = provider(&handle).read(KIND, &existing("A", "c1")).await;
    assert!(outcome.error.is_none());
    assert!(outcome.state.is_absent());
    assert!(handle.executed().is_empty());
}

#[tokio::test]
async fn test_read_reports_exempt_flag() {
    let handle = Arc::new(ScriptedHandle::new());
    handle
        .on_query(
            "SHOW MASKING POLICIES",
            vec![show_row("db", "sch", "A", "c1").with("options", r#"{"EXEMPT_OTHER_POLICIES":"true"}"#)],
        )
        .on_query("DESCRIBE MASKING POLICY", vec![describe_row("A", BODY)]);
    let state = provider(&handle)
        .read(KIND, &existing("A", "c1"))
        .await
        .into_result()
        .unwrap();
    assert_eq!(state.attributes["exempt_other_policies"], json!(true));

    let plan = Provider::plan(KIND, Some(&state), &existing("A", "c1").attributes).unwrap();
    assert_eq!(plan.action, PlanAction::Replace);
    assert!(plan.change("exempt_other_policies").unwrap().force_new);
}

#[tokio::test]
async fn test_invalid_config_dispatches_nothing() {
    let handle = Arc::new(ScriptedHandle::new());
    let mut config = s1_config();
    config.insert("signature".to_string(), json!([]));
    let outcome = provider(&handle).create(KIND, config).await;
    assert_eq!(outcome.error.unwrap().kind(), ErrorKind::InvalidAttribute);
    assert!(handle.dispatched().is_empty());
    assert!(outcome.state.is_absent());
}

#[tokio::test]
async fn test_cancelled_provider_dispatches_nothing() {
    let handle = Arc::new(ScriptedHandle::new());
    let provider = provider(&handle);
    provider.context().cancel();
    let outcome = provider.delete(KIND, &existing("A", "c1")).await;
    assert_eq!(outcome.error.unwrap().kind(), ErrorKind::RemoteExecution);
    assert!(handle.dispatched().is_empty());
    assert!(!outcome.state.is_absent());
}

#[test]
fn test_signature_change_forces_replacement() {
    let prior = existing("A", "c1");
    let mut desired = prior.attributes.clone();
    desired.insert(
        "signature".to_string(),
        json!([{"name": "val", "type": "NUMBER"}]),
    );
    let plan = Provider::plan(KIND, Some(&prior), &desired).unwrap();
    assert_eq!(plan.action, PlanAction::Replace);

    let mut renamed = prior.attributes.clone();
    renamed.insert("name".to_string(), json!("B"));
    renamed.insert("or_replace".to_string(), json!(true));
    let plan = Provider::plan(KIND, Some(&prior), &renamed).unwrap();
    assert_eq!(plan.action, PlanAction::Update);
    assert_eq!(plan.changes.len(), 1);
}

//! Plan engine: classify the difference between persisted and desired state.
//!
//! Per attribute, in order: computed attributes are skipped, equal values are skipped,
//! the attribute's suppress predicate may declare the pair equal, and anything left is a
//! change. A surviving change to a force-new attribute turns the whole plan into a
//! replace.

use frostline_core::{AttributeMap, StateEnvelope, SuppressContext};
use serde::Serialize;
use serde_json::Value;

use crate::schema::{AttributeSchema, ResourceSchema};

const SENSITIVE: &str = "(sensitive value)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    Create,
    NoOp,
    Update,
    Replace,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeChange {
    pub attribute: String,
    pub old: Value,
    pub new: Value,
    pub force_new: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub action: PlanAction,
    pub changes: Vec<AttributeChange>,
}

impl Plan {
    pub fn is_noop(&self) -> bool {
        self.action == PlanAction::NoOp
    }

    pub fn change(&self, attribute: &str) -> Option<&AttributeChange> {
        self.changes.iter().find(|c| c.attribute == attribute)
    }
}

/// Value of `attr` in `map`, with the schema default standing in for absent or null.
pub(crate) fn effective(attr: &AttributeSchema, map: &AttributeMap) -> Value {
    match map.get(attr.name) {
        Some(v) if !v.is_null() => v.clone(),
        _ => attr.default.clone().unwrap_or(Value::Null),
    }
}

fn masked(attr: &AttributeSchema, value: Value) -> Value {
    if attr.sensitive && !value.is_null() {
        Value::String(SENSITIVE.to_string())
    } else {
        value
    }
}

/// Plan `desired` against `prior`. A missing or absent prior plans a create.
pub fn plan(schema: &ResourceSchema, prior: Option<&StateEnvelope>, desired: &AttributeMap) -> Plan {
    let Some(prior) = prior.filter(|p| !p.is_absent()) else {
        let changes = schema
            .attributes
            .iter()
            .filter(|a| !a.computed)
            .filter_map(|a| {
                let new = effective(a, desired);
                (!new.is_null()).then(|| AttributeChange {
                    attribute: a.name.to_string(),
                    old: Value::Null,
                    new: masked(a, new),
                    force_new: a.force_new,
                })
            })
            .collect();
        return Plan {
            action: PlanAction::Create,
            changes,
        };
    };

    let ctx = SuppressContext { id: &prior.id };
    let mut changes = Vec::new();
    for attr in schema.attributes.iter().filter(|a| !a.computed) {
        let old = effective(attr, &prior.attributes);
        let new = effective(attr, desired);
        if old == new {
            continue;
        }
        if attr.suppress.is_some_and(|suppressed| suppressed(&ctx, &old, &new)) {
            continue;
        }
        changes.push(AttributeChange {
            attribute: attr.name.to_string(),
            old: masked(attr, old),
            new: masked(attr, new),
            force_new: attr.force_new,
        });
    }

    let action = if changes.is_empty() {
        PlanAction::NoOp
    } else if changes.iter().any(|c| c.force_new) {
        PlanAction::Replace
    } else {
        PlanAction::Update
    };
    Plan { action, changes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frostline_core::suppress;
    use serde_json::json;

    fn schema() -> ResourceSchema {
        ResourceSchema {
            type_name: "test_resource",
            version: 0,
            attributes: vec![
                AttributeSchema::required("name"),
                AttributeSchema::required("kind").force_new(),
                AttributeSchema::optional("body").suppress_with(suppress::trimmed_body),
                AttributeSchema::optional("flag").default_value(json!(false)),
                AttributeSchema::creation_flag("or_replace"),
                AttributeSchema::optional("secret")
                    .write_only()
                    .sensitive()
                    .suppress_with(suppress::import_blank),
                AttributeSchema::computed("fqn"),
            ],
        }
    }

    fn attrs(value: Value) -> AttributeMap {
        value.as_object().cloned().unwrap()
    }

    fn prior(value: Value) -> StateEnvelope {
        StateEnvelope::new("X", 0, attrs(value))
    }

    #[test]
    fn test_create_without_prior() {
        let plan = plan(&schema(), None, &attrs(json!({"name": "a", "kind": "k", "secret": "s"})));
        assert_eq!(plan.action, PlanAction::Create);
        assert_eq!(plan.change("flag").unwrap().new, json!(false));
        assert_eq!(plan.change("secret").unwrap().new, json!(SENSITIVE));
        assert!(plan.change("fqn").is_none());
    }

    #[test]
    fn test_absent_prior_plans_create() {
        let absent = StateEnvelope::default();
        let plan = plan(&schema(), Some(&absent), &attrs(json!({"name": "a", "kind": "k"})));
        assert_eq!(plan.action, PlanAction::Create);
    }

    #[test]
    fn test_noop_with_suppressed_and_defaulted_values() {
        let prior = prior(json!({
            "name": "a", "kind": "k", "body": "  val  ", "or_replace": true, "fqn": "computed"
        }));
        let desired = attrs(json!({"name": "a", "kind": "k", "body": "val", "flag": false}));
        assert!(plan(&schema(), Some(&prior), &desired).is_noop());
    }

    #[test]
    fn test_update_on_mutable_change() {
        let prior = prior(json!({"name": "a", "kind": "k"}));
        let plan = plan(&schema(), Some(&prior), &attrs(json!({"name": "b", "kind": "k"})));
        assert_eq!(plan.action, PlanAction::Update);
        assert_eq!(plan.changes.len(), 1);
        assert_eq!(plan.changes[0].old, json!("a"));
    }

    #[test]
    fn test_replace_on_force_new_change() {
        let prior = prior(json!({"name": "a", "kind": "k"}));
        let plan = plan(&schema(), Some(&prior), &attrs(json!({"name": "b", "kind": "j"})));
        assert_eq!(plan.action, PlanAction::Replace);
        assert!(plan.change("kind").unwrap().force_new);
    }

    #[test]
    fn test_import_blank_secret() {
        let imported = prior(json!({"name": "a", "kind": "k", "secret": ""}));
        let desired = attrs(json!({"name": "a", "kind": "k", "secret": "s3cret"}));
        assert!(plan(&schema(), Some(&imported), &desired).is_noop());

        let known = prior(json!({"name": "a", "kind": "k", "secret": "old"}));
        let plan = plan(&schema(), Some(&known), &desired);
        let change = plan.change("secret").unwrap();
        assert_eq!(change.old, json!(SENSITIVE));
        assert_eq!(change.new, json!(SENSITIVE));
    }
}

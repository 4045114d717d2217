//! Working copy of one resource during a controller call.

use std::collections::BTreeSet;

use frostline_core::{AttributeMap, StateEnvelope};
use serde_json::Value;

/// Prior state, desired configuration, and the state being written back.
///
/// Controllers parse [`ResourceData::desired`], compare with [`ResourceData::has_change`],
/// and move a desired value into state with [`ResourceData::commit`] once the statement
/// applying it has succeeded. Observed values are written with [`ResourceData::set`].
/// Clearing the id marks the object absent.
#[derive(Debug, Clone, Default)]
pub struct ResourceData {
    id: String,
    prior: AttributeMap,
    desired: AttributeMap,
    state: AttributeMap,
    computed: BTreeSet<String>,
}

impl ResourceData {
    /// Fresh object: state starts as the desired configuration.
    pub fn for_create(config: AttributeMap) -> Self {
        Self {
            id: String::new(),
            prior: AttributeMap::new(),
            state: config.clone(),
            desired: config,
            computed: BTreeSet::new(),
        }
    }

    /// Existing object with no new configuration (Read, Delete).
    pub fn from_state(envelope: &StateEnvelope) -> Self {
        Self {
            id: envelope.id.clone(),
            prior: envelope.attributes.clone(),
            desired: envelope.attributes.clone(),
            state: envelope.attributes.clone(),
            computed: envelope.computed.clone(),
        }
    }

    /// Existing object moving to `config`. State starts as the prior state.
    pub fn for_update(envelope: &StateEnvelope, config: AttributeMap) -> Self {
        Self {
            id: envelope.id.clone(),
            prior: envelope.attributes.clone(),
            desired: config,
            state: envelope.attributes.clone(),
            computed: envelope.computed.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn is_absent(&self) -> bool {
        self.id.is_empty()
    }

    pub fn desired(&self) -> &AttributeMap {
        &self.desired
    }

    pub fn state(&self) -> &AttributeMap {
        &self.state
    }

    /// Current state value; null reads as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.state.get(key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn prior_str(&self, key: &str) -> Option<&str> {
        self.prior.get(key).and_then(Value::as_str)
    }

    /// Whether the desired value differs from the prior one. Null, `""` and absent are equal.
    pub fn has_change(&self, key: &str) -> bool {
        let norm = |v: Option<&Value>| {
            v.filter(|v| !v.is_null() && v.as_str() != Some("")).cloned()
        };
        norm(self.prior.get(key)) != norm(self.desired.get(key))
    }

    /// Record that the desired value of `key` is now applied.
    pub fn commit(&mut self, key: &str) {
        let value = self.desired.get(key).cloned().unwrap_or(Value::Null);
        self.state.insert(key.to_string(), value);
    }

    /// Record every desired value as applied.
    pub fn commit_all(&mut self) {
        let desired = self.desired.clone();
        self.state.extend(desired);
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.state.insert(key.to_string(), value.into());
    }

    /// Set an optional value; `None` stores null.
    pub fn set_opt(&mut self, key: &str, value: Option<String>) {
        self.state
            .insert(key.to_string(), value.map_or(Value::Null, Value::String));
    }

    pub fn set_computed(&mut self, key: &str, value: impl Into<Value>) {
        self.computed.insert(key.to_string());
        self.set(key, value);
    }

    pub fn into_envelope(self, schema_version: u32) -> StateEnvelope {
        StateEnvelope {
            id: self.id,
            schema_version,
            attributes: self.state,
            computed: self.computed,
        }
    }
}

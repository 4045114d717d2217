//! Persisted resource state.
//!
//! ```json
//! {
//!   "id": "DB|SCH|P",
//!   "schema_version": 1,
//!   "attributes": { "name": "P", "comment": "..." },
//!   "computed": ["fully_qualified_name"]
//! }
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProviderResult;

/// Untyped attribute map as exchanged with the host.
pub type AttributeMap = serde_json::Map<String, Value>;

/// Host-managed record of one resource: id, attributes and schema version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateEnvelope {
    /// Durable primary key. Empty means the object is absent.
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub schema_version: u32,

    #[serde(default)]
    pub attributes: AttributeMap,

    /// Attributes owned by the provider rather than the user.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub computed: BTreeSet<String>,
}

impl StateEnvelope {
    pub fn new(id: impl Into<String>, schema_version: u32, attributes: AttributeMap) -> Self {
        Self {
            id: id.into(),
            schema_version,
            attributes,
            computed: BTreeSet::new(),
        }
    }

    pub fn from_json(content: &str) -> ProviderResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json(&self) -> ProviderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_absent(&self) -> bool {
        self.id.is_empty()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}

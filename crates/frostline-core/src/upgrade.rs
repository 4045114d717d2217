//! State upgrades across schema versions.
//!
//! An upgrader is an ordered list of `(from_version, transform)` steps. Envelopes below the
//! current version run through every step from their own version upwards. Transforms are
//! plain functions over the envelope; nothing here holds state.

use serde_json::Value;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::ident::SchemaObjectIdentifier;
use crate::state::StateEnvelope;

pub type Transform = fn(StateEnvelope) -> ProviderResult<StateEnvelope>;

#[derive(Clone, Copy)]
pub struct UpgradeStep {
    pub from_version: u32,
    pub transform: Transform,
}

#[derive(Clone)]
pub struct StateUpgrader {
    current_version: u32,
    steps: Vec<UpgradeStep>,
}

impl StateUpgrader {
    pub fn new(current_version: u32, mut steps: Vec<UpgradeStep>) -> Self {
        steps.sort_by_key(|s| s.from_version);
        Self {
            current_version,
            steps,
        }
    }

    pub fn current_version(&self) -> u32 {
        self.current_version
    }

    /// Bring `envelope` up to the current version.
    pub fn upgrade(&self, mut envelope: StateEnvelope) -> ProviderResult<StateEnvelope> {
        if envelope.schema_version > self.current_version {
            return Err(ProviderError::state(format!(
                "state schema version {} is newer than supported version {}",
                envelope.schema_version, self.current_version
            )));
        }

        for step in &self.steps {
            if step.from_version != envelope.schema_version
                || envelope.schema_version >= self.current_version
            {
                continue;
            }
            debug!(
                id = %envelope.id,
                from = step.from_version,
                "upgrading resource state"
            );
            envelope = (step.transform)(envelope)?;
            envelope.schema_version = step.from_version + 1;
        }

        if envelope.schema_version != self.current_version {
            return Err(ProviderError::state(format!(
                "no upgrade path from schema version {} to {}",
                envelope.schema_version, self.current_version
            )));
        }
        Ok(envelope)
    }
}

/// Current masking-policy state schema version.
pub const MASKING_POLICY_SCHEMA_VERSION: u32 = 1;

/// v0 stored `qualified_name` in dotted form; v1 stores the SQL form as
/// `fully_qualified_name` and marks it computed.
pub fn masking_policy_v0(mut envelope: StateEnvelope) -> ProviderResult<StateEnvelope> {
    if let Some(legacy) = envelope.attributes.remove("qualified_name") {
        let fully_qualified = match legacy {
            Value::String(dotted) if !dotted.is_empty() => {
                Value::String(SchemaObjectIdentifier::parse_dotted(&dotted)?.fully_qualified())
            }
            other => other,
        };
        envelope
            .attributes
            .insert("fully_qualified_name".to_string(), fully_qualified);
    }
    envelope.computed.insert("fully_qualified_name".to_string());
    Ok(envelope)
}

pub fn masking_policy_upgrader() -> StateUpgrader {
    StateUpgrader::new(
        MASKING_POLICY_SCHEMA_VERSION,
        vec![UpgradeStep {
            from_version: 0,
            transform: masking_policy_v0,
        }],
    )
}

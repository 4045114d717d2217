//! Host-facing entry points.
//!
//! The host hands over envelopes and attribute maps; [`Provider`] upgrades state, builds
//! a [`ResourceData`], runs the controller and returns the resulting envelope together
//! with any error. State is returned even on failure so a partially applied update (for
//! example a rename that succeeded before a body change failed) keeps its new id.

use std::sync::Arc;

use frostline_catalog::{Catalog, Context, SqlHandle};
use frostline_core::{
    AttributeMap, Diagnostic, ProviderConfig, ProviderError, ProviderResult, StateEnvelope,
};

use crate::data::ResourceData;
use crate::plan::{self, Plan};
use crate::resources::ResourceKind;

/// Result of one controller call.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub state: StateEnvelope,
    pub error: Option<ProviderError>,
}

impl Outcome {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.error.iter().map(Diagnostic::from_error).collect()
    }

    pub fn into_result(self) -> ProviderResult<StateEnvelope> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.state),
        }
    }
}

pub struct Provider {
    handle: Arc<dyn SqlHandle>,
    ctx: Context,
}

impl Provider {
    pub fn new(handle: Arc<dyn SqlHandle>, config: ProviderConfig) -> Self {
        Self {
            handle,
            ctx: Context::new(config),
        }
    }

    pub fn with_context(handle: Arc<dyn SqlHandle>, ctx: Context) -> Self {
        Self { handle, ctx }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Decode a persisted envelope and bring it to the kind's current version.
    pub fn load_state(kind: ResourceKind, json: &str) -> ProviderResult<StateEnvelope> {
        kind.resource()
            .upgrader()
            .upgrade(StateEnvelope::from_json(json)?)
    }

    /// Validate `desired` and plan it against `prior`. Never dispatches.
    pub fn plan(
        kind: ResourceKind,
        prior: Option<&StateEnvelope>,
        desired: &AttributeMap,
    ) -> ProviderResult<Plan> {
        let resource = kind.resource();
        resource.validate(desired)?;
        Ok(plan::plan(&resource.schema(), prior, desired))
    }

    fn finish(kind: ResourceKind, data: ResourceData, result: ProviderResult<()>) -> Outcome {
        Outcome {
            state: data.into_envelope(kind.resource().schema().version),
            error: result.err(),
        }
    }

    pub async fn create(&self, kind: ResourceKind, config: AttributeMap) -> Outcome {
        let catalog = Catalog::new(self.handle.as_ref(), &self.ctx);
        let mut data = ResourceData::for_create(config);
        let result = kind.resource().create(&catalog, &mut data).await;
        Self::finish(kind, data, result)
    }

    pub async fn read(&self, kind: ResourceKind, state: &StateEnvelope) -> Outcome {
        let catalog = Catalog::new(self.handle.as_ref(), &self.ctx);
        let mut data = ResourceData::from_state(state);
        let result = kind.resource().read(&catalog, &mut data).await;
        Self::finish(kind, data, result)
    }

    pub async fn update(
        &self,
        kind: ResourceKind,
        state: &StateEnvelope,
        config: AttributeMap,
    ) -> Outcome {
        let catalog = Catalog::new(self.handle.as_ref(), &self.ctx);
        let mut data = ResourceData::for_update(state, config);
        let result = kind.resource().update(&catalog, &mut data).await;
        Self::finish(kind, data, result)
    }

    pub async fn delete(&self, kind: ResourceKind, state: &StateEnvelope) -> Outcome {
        let catalog = Catalog::new(self.handle.as_ref(), &self.ctx);
        let mut data = ResourceData::from_state(state);
        let result = kind.resource().delete(&catalog, &mut data).await;
        Self::finish(kind, data, result)
    }
}

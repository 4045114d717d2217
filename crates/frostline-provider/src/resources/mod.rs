//! Per-kind resource controllers.
//!
//! Every controller follows the same contract. Create dispatches and then reads back.
//! Read clears the id when the object is gone. Update applies in-place changes (renames
//! first) and reads back. Delete clears the id and tolerates an already-absent object.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use frostline_catalog::Catalog;
use frostline_core::{AttributeMap, ProviderError, ProviderResult, StateUpgrader};
use tracing::warn;

use crate::data::ResourceData;
use crate::schema::ResourceSchema;

pub mod account;
pub mod column_masking_policy;
pub mod masking_policy;
pub mod tag_masking_policy;

pub use account::AccountResource;
pub use column_masking_policy::ColumnMaskingPolicyResource;
pub use masking_policy::MaskingPolicyResource;
pub use tag_masking_policy::TagMaskingPolicyResource;

#[async_trait]
pub trait Resource: Send + Sync {
    fn schema(&self) -> ResourceSchema;

    fn upgrader(&self) -> StateUpgrader {
        StateUpgrader::new(self.schema().version, Vec::new())
    }

    /// Validate `config` and render the statement Create would dispatch.
    fn render_create(&self, config: &AttributeMap) -> ProviderResult<String>;

    /// Plan-time validation. Never dispatches.
    fn validate(&self, config: &AttributeMap) -> ProviderResult<()> {
        self.render_create(config).map(|_| ())
    }

    async fn create(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()>;

    async fn read(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()>;

    async fn update(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()>;

    async fn delete(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()>;
}

/// Clear the id of an object that disappeared out-of-band.
pub(crate) fn mark_gone(data: &mut ResourceData, kind: &str) -> ProviderResult<()> {
    warn!(id = %data.id(), kind, "object no longer exists on the remote; removing it from state");
    data.clear_id();
    Ok(())
}

/// Managed resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    MaskingPolicy,
    TagMaskingPolicyAssociation,
    TableColumnMaskingPolicyApplication,
    Account,
}

static MASKING_POLICY: MaskingPolicyResource = MaskingPolicyResource;
static TAG_MASKING_POLICY: TagMaskingPolicyResource = TagMaskingPolicyResource;
static COLUMN_MASKING_POLICY: ColumnMaskingPolicyResource = ColumnMaskingPolicyResource;
static ACCOUNT: AccountResource = AccountResource;

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::MaskingPolicy,
        ResourceKind::TagMaskingPolicyAssociation,
        ResourceKind::TableColumnMaskingPolicyApplication,
        ResourceKind::Account,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaskingPolicy => "masking_policy",
            Self::TagMaskingPolicyAssociation => "tag_masking_policy_association",
            Self::TableColumnMaskingPolicyApplication => "table_column_masking_policy_application",
            Self::Account => "account",
        }
    }

    pub fn resource(&self) -> &'static dyn Resource {
        match self {
            Self::MaskingPolicy => &MASKING_POLICY,
            Self::TagMaskingPolicyAssociation => &TAG_MASKING_POLICY,
            Self::TableColumnMaskingPolicyApplication => &COLUMN_MASKING_POLICY,
            Self::Account => &ACCOUNT,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(ResourceKind::as_str).collect();
                ProviderError::unsupported(
                    format!("resource kind {s:?}"),
                    format!("expected one of {}", known.join(", ")),
                )
            })
    }
}

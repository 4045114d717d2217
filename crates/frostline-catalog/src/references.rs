//! Tag attachment and column application verbs. Both are read back through
//! `INFORMATION_SCHEMA.POLICY_REFERENCES`.

use frostline_core::ddl::{column, tag};
use frostline_core::{ProviderResult, SchemaObjectIdentifier, TableColumnIdentifier};

use crate::catalog::{Applied, Catalog};
use crate::handle::Row;

/// A masking policy reference as reported by the catalog. Names are exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyReference {
    pub policy: SchemaObjectIdentifier,
    pub column: Option<String>,
}

impl PolicyReference {
    fn from_row(row: &Row) -> Option<Self> {
        Some(Self {
            policy: SchemaObjectIdentifier::new(
                row.get("policy_db")?,
                row.get("policy_schema")?,
                row.get("policy_name")?,
            ),
            column: row.get_non_empty("ref_column_name").map(str::to_string),
        })
    }
}

fn first_reference(rows: Option<Vec<Row>>) -> Option<PolicyReference> {
    rows?.iter().find_map(PolicyReference::from_row)
}

impl Catalog<'_> {
    pub async fn set_tag_policy(
        &self,
        tag_id: &SchemaObjectIdentifier,
        policy: &SchemaObjectIdentifier,
    ) -> ProviderResult<()> {
        self.execute_required(&tag::set_masking_policy(tag_id, policy), || {
            format!("tag {} or masking policy {}", tag_id, policy)
        })
        .await
    }

    pub async fn unset_tag_policy(
        &self,
        tag_id: &SchemaObjectIdentifier,
        policy: &SchemaObjectIdentifier,
    ) -> ProviderResult<Applied> {
        self.execute(&tag::unset_masking_policy(tag_id, policy)).await
    }

    /// `None` when the tag is gone or no longer carries `policy`.
    pub async fn read_tag_policy(
        &self,
        tag_id: &SchemaObjectIdentifier,
        policy: &SchemaObjectIdentifier,
    ) -> ProviderResult<Option<PolicyReference>> {
        let rows = self.fetch(&tag::policy_references(tag_id, policy)).await?;
        Ok(first_reference(rows))
    }

    pub async fn apply_column_policy(
        &self,
        column_id: &TableColumnIdentifier,
        policy: &SchemaObjectIdentifier,
    ) -> ProviderResult<()> {
        self.execute_required(&column::set_masking_policy(column_id, policy), || {
            format!("table {} or masking policy {}", column_id.table, policy)
        })
        .await
    }

    pub async fn unset_column_policy(
        &self,
        column_id: &TableColumnIdentifier,
    ) -> ProviderResult<Applied> {
        self.execute(&column::unset_masking_policy(column_id)).await
    }

    /// The masking policy currently applied to the column, whichever it is.
    pub async fn read_column_policy(
        &self,
        column_id: &TableColumnIdentifier,
    ) -> ProviderResult<Option<PolicyReference>> {
        let rows = self
            .fetch(&column::policy_references_for_column(column_id))
            .await?;
        Ok(first_reference(rows))
    }
}

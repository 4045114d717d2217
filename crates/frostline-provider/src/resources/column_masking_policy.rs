//! `table_column_masking_policy_application` resource.
//!
//! The persisted id is the dotted column path `DB.SCHEMA.TABLE.COLUMN`. Reading back
//! looks up whichever policy the column carries, so an id alone is enough to import.

use async_trait::async_trait;
use frostline_catalog::Catalog;
use frostline_core::ddl::column;
use frostline_core::{suppress, validate};
use frostline_core::{AttributeMap, ProviderResult, SchemaObjectIdentifier, TableColumnIdentifier};
use tracing::{debug, info, warn};

use super::{mark_gone, Resource};
use crate::attrs;
use crate::data::ResourceData;
use crate::schema::{AttributeSchema, ResourceSchema};

const KIND: &str = "table_column_masking_policy_application";

fn policy_ref(map: &AttributeMap) -> ProviderResult<SchemaObjectIdentifier> {
    SchemaObjectIdentifier::parse_dotted(attrs::required_str(map, "masking_policy")?)
}

fn config_ids(map: &AttributeMap) -> ProviderResult<(TableColumnIdentifier, SchemaObjectIdentifier)> {
    let table = SchemaObjectIdentifier::parse_dotted(attrs::required_str(map, "table")?)?;
    let column = validate::column_name("column", attrs::required_str(map, "column")?)?;
    let column_id = TableColumnIdentifier::new(table, column);
    Ok((column_id, policy_ref(map)?))
}

pub struct ColumnMaskingPolicyResource;

#[async_trait]
impl Resource for ColumnMaskingPolicyResource {
    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            type_name: KIND,
            version: 0,
            attributes: vec![
                AttributeSchema::required("table")
                    .force_new()
                    .suppress_with(suppress::identifier),
                AttributeSchema::required("column")
                    .force_new()
                    .suppress_with(suppress::column_name),
                AttributeSchema::required("masking_policy")
                    .force_new()
                    .suppress_with(suppress::identifier),
            ],
        }
    }

    fn render_create(&self, config: &AttributeMap) -> ProviderResult<String> {
        let (column_id, policy) = config_ids(config)?;
        Ok(column::set_masking_policy(&column_id, &policy))
    }

    async fn create(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let (column_id, policy) = config_ids(data.desired())?;
        catalog.apply_column_policy(&column_id, &policy).await?;

        let id = column_id.emit_dotted();
        info!(%id, %policy, "applied masking policy to column");
        data.set_id(id);
        self.read(catalog, data).await
    }

    async fn read(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let column_id = TableColumnIdentifier::parse_dotted(data.id())?;
        let Some(reference) = catalog.read_column_policy(&column_id).await? else {
            return mark_gone(data, KIND);
        };

        data.set("table", column_id.table.emit_dotted());
        data.set("column", column_id.column.value());
        data.set("masking_policy", reference.policy.emit_dotted());
        Ok(())
    }

    async fn update(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        debug!(id = %data.id(), "nothing to alter in place");
        data.commit_all();
        self.read(catalog, data).await
    }

    async fn delete(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let column_id = TableColumnIdentifier::parse_dotted(data.id())?;
        if catalog.unset_column_policy(&column_id).await?.is_missing() {
            warn!(id = %data.id(), "table already absent");
        } else {
            info!(id = %data.id(), "removed masking policy from column");
        }
        data.clear_id();
        Ok(())
    }
}

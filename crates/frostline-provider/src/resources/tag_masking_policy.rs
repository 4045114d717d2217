//! `tag_masking_policy_association` resource. Every attribute is force-new.

use async_trait::async_trait;
use frostline_catalog::Catalog;
use frostline_core::ddl::tag;
use frostline_core::{
    AttributeMap, ProviderResult, SchemaObjectIdentifier, TagMaskingPolicyIdentifier,
};
use tracing::{debug, info, warn};

use super::{mark_gone, Resource};
use crate::attrs;
use crate::data::ResourceData;
use crate::schema::{AttributeSchema, ResourceSchema};

const KIND: &str = "tag_masking_policy_association";

fn config_id(map: &AttributeMap) -> ProviderResult<TagMaskingPolicyIdentifier> {
    Ok(TagMaskingPolicyIdentifier::new(
        SchemaObjectIdentifier::parse_pipe(attrs::required_str(map, "tag_id")?)?,
        SchemaObjectIdentifier::parse_pipe(attrs::required_str(map, "masking_policy_id")?)?,
    ))
}

pub struct TagMaskingPolicyResource;

#[async_trait]
impl Resource for TagMaskingPolicyResource {
    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            type_name: KIND,
            version: 0,
            attributes: vec![
                AttributeSchema::required("tag_id").force_new(),
                AttributeSchema::required("masking_policy_id").force_new(),
            ],
        }
    }

    fn render_create(&self, config: &AttributeMap) -> ProviderResult<String> {
        let id = config_id(config)?;
        Ok(tag::set_masking_policy(&id.tag, &id.policy))
    }

    async fn create(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let id = config_id(data.desired())?;
        catalog.set_tag_policy(&id.tag, &id.policy).await?;

        info!(%id, "attached masking policy to tag");
        data.set_id(id.emit_pipe());
        self.read(catalog, data).await
    }

    async fn read(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let id = TagMaskingPolicyIdentifier::parse_pipe(data.id())?;
        if catalog.read_tag_policy(&id.tag, &id.policy).await?.is_none() {
            return mark_gone(data, KIND);
        }
        data.set("tag_id", id.tag.emit_pipe());
        data.set("masking_policy_id", id.policy.emit_pipe());
        Ok(())
    }

    async fn update(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        debug!(id = %data.id(), "nothing to alter in place");
        data.commit_all();
        self.read(catalog, data).await
    }

    async fn delete(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let id = TagMaskingPolicyIdentifier::parse_pipe(data.id())?;
        if catalog.unset_tag_policy(&id.tag, &id.policy).await?.is_missing() {
            warn!(%id, "tag or masking policy already absent");
        } else {
            info!(%id, "detached masking policy from tag");
        }
        data.clear_id();
        Ok(())
    }
}

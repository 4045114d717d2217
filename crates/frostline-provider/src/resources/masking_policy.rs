//! `masking_policy` resource.

use async_trait::async_trait;
use frostline_catalog::Catalog;
use frostline_core::datatype::{self, DataType};
use frostline_core::ddl::masking_policy::{self, CreateMaskingPolicy, MaskingPolicyAlter, TypedColumn};
use frostline_core::suppress::{self, normalize_body};
use frostline_core::upgrade::{self, MASKING_POLICY_SCHEMA_VERSION};
use frostline_core::{validate, AttributeMap, ProviderResult, SchemaObjectIdentifier, StateUpgrader};
use serde_json::json;
use tracing::{info, warn};

use super::{mark_gone, Resource};
use crate::attrs;
use crate::data::ResourceData;
use crate::schema::{AttributeSchema, ResourceSchema};

const KIND: &str = "masking_policy";

/// Desired masking policy, validated.
#[derive(Debug, Clone)]
pub struct MaskingPolicyConfig {
    pub id: SchemaObjectIdentifier,
    pub signature: Vec<TypedColumn>,
    pub return_type: DataType,
    pub body: String,
    pub comment: Option<String>,
    pub exempt_other_policies: bool,
    pub or_replace: bool,
    pub if_not_exists: bool,
}

impl MaskingPolicyConfig {
    pub fn from_attributes(map: &AttributeMap) -> ProviderResult<Self> {
        let id = SchemaObjectIdentifier::new(
            attrs::required_str(map, "database")?,
            attrs::required_str(map, "schema")?,
            attrs::required_str(map, "name")?,
        );
        let signature = validate::signature(&attrs::signature(map, "signature")?)?;
        let return_type =
            validate::data_type("return_data_type", attrs::required_str(map, "return_data_type")?)?;
        Ok(Self {
            id,
            signature,
            return_type,
            body: attrs::required_str(map, "masking_expression")?.to_string(),
            comment: attrs::optional_non_empty(map, "comment")?.map(str::to_string),
            exempt_other_policies: attrs::bool_or(map, "exempt_other_policies", false)?,
            or_replace: attrs::bool_or(map, "or_replace", false)?,
            if_not_exists: attrs::bool_or(map, "if_not_exists", false)?,
        })
    }

    pub fn to_request(&self) -> CreateMaskingPolicy {
        CreateMaskingPolicy {
            id: self.id.clone(),
            signature: self.signature.clone(),
            return_type: self.return_type.clone(),
            body: self.body.clone(),
            comment: self.comment.clone(),
            exempt_other_policies: self.exempt_other_policies,
            or_replace: self.or_replace,
            if_not_exists: self.if_not_exists,
        }
    }
}

pub struct MaskingPolicyResource;

impl MaskingPolicyResource {
    async fn alter(
        &self,
        catalog: &Catalog<'_>,
        id: &SchemaObjectIdentifier,
        change: MaskingPolicyAlter,
    ) -> ProviderResult<bool> {
        let missing = catalog.alter_mp(id, &change).await?.is_missing();
        if missing {
            warn!(%id, "masking policy vanished during update");
        }
        Ok(!missing)
    }
}

#[async_trait]
impl Resource for MaskingPolicyResource {
    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            type_name: KIND,
            version: MASKING_POLICY_SCHEMA_VERSION,
            attributes: vec![
                AttributeSchema::required("name"),
                AttributeSchema::required("database").force_new(),
                AttributeSchema::required("schema").force_new(),
                AttributeSchema::required("signature")
                    .force_new()
                    .suppress_with(suppress::signature),
                AttributeSchema::required("masking_expression")
                    .suppress_with(suppress::trimmed_body),
                AttributeSchema::required("return_data_type")
                    .force_new()
                    .suppress_with(suppress::data_type),
                AttributeSchema::optional("exempt_other_policies")
                    .force_new()
                    .default_value(json!(false)),
                AttributeSchema::optional("comment").suppress_with(suppress::blank_as_null),
                AttributeSchema::creation_flag("or_replace"),
                AttributeSchema::creation_flag("if_not_exists"),
                AttributeSchema::computed("fully_qualified_name"),
            ],
        }
    }

    fn upgrader(&self) -> StateUpgrader {
        upgrade::masking_policy_upgrader()
    }

    fn render_create(&self, config: &AttributeMap) -> ProviderResult<String> {
        let config = MaskingPolicyConfig::from_attributes(config)?;
        Ok(masking_policy::create(&config.to_request()))
    }

    async fn create(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let config = MaskingPolicyConfig::from_attributes(data.desired())?;
        catalog.create_mp(&config.to_request()).await?;

        let id = config.id.emit_pipe();
        info!(%id, "created masking policy");
        data.set_id(id);
        self.read(catalog, data).await
    }

    async fn read(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let id = SchemaObjectIdentifier::parse_pipe(data.id())?;
        let Some(row) = catalog.show_mp(&id).await? else {
            return mark_gone(data, KIND);
        };
        let Some(description) = catalog.describe_mp(&id).await? else {
            return mark_gone(data, KIND);
        };

        data.set("name", row.name);
        data.set("database", row.database_name);
        data.set("schema", row.schema_name);
        data.set_opt("comment", row.comment);
        data.set("exempt_other_policies", row.exempt_other_policies);
        data.set("signature", attrs::signature_value(&description.signature));
        data.set("masking_expression", description.body);

        // Keep the configured spelling when the remote reports an equivalent type.
        let return_type = match data.get_str("return_data_type") {
            Some(known) if datatype::equivalent(known, &description.return_type) => known.to_string(),
            _ => description.return_type,
        };
        data.set("return_data_type", return_type);
        data.set_computed("fully_qualified_name", id.fully_qualified());
        Ok(())
    }

    async fn update(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let mut id = SchemaObjectIdentifier::parse_pipe(data.id())?;

        // Later statements address the policy by its new name.
        if data.has_change("name") {
            let new_id = id.with_name(attrs::required_str(data.desired(), "name")?);
            if !self
                .alter(catalog, &id, MaskingPolicyAlter::Rename(new_id.clone()))
                .await?
            {
                return self.read(catalog, data).await;
            }
            info!(from = %id, to = %new_id, "renamed masking policy");
            data.set_id(new_id.emit_pipe());
            data.commit("name");
            id = new_id;
        }

        if data.has_change("masking_expression") {
            let body = attrs::required_str(data.desired(), "masking_expression")?.to_string();
            let unchanged = data
                .prior_str("masking_expression")
                .is_some_and(|prior| normalize_body(prior) == normalize_body(&body));
            if !unchanged && !self.alter(catalog, &id, MaskingPolicyAlter::SetBody(body)).await? {
                return self.read(catalog, data).await;
            }
            data.commit("masking_expression");
        }

        if data.has_change("comment") {
            let change = match attrs::optional_non_empty(data.desired(), "comment")? {
                Some(comment) => MaskingPolicyAlter::SetComment(comment.to_string()),
                None => MaskingPolicyAlter::UnsetComment,
            };
            if !self.alter(catalog, &id, change).await? {
                return self.read(catalog, data).await;
            }
            data.commit("comment");
        }

        // Force-new attributes are unchanged here; creation flags are not observable.
        data.commit_all();
        self.read(catalog, data).await
    }

    async fn delete(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let id = SchemaObjectIdentifier::parse_pipe(data.id())?;
        if catalog.drop_mp(&id).await?.is_missing() {
            warn!(%id, "masking policy already absent");
        } else {
            info!(%id, "dropped masking policy");
        }
        data.clear_id();
        Ok(())
    }
}

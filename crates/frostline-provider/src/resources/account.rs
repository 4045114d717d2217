//! `account` resource.
//!
//! Accounts are keyed by the server-assigned locator, discovered after creation by name.
//! Administrator fields are one-shot and never read back. Everything observable is
//! force-new, so Update only refreshes. Accounts cannot be dropped.

use async_trait::async_trait;
use frostline_catalog::{AccountRow, Catalog};
use frostline_core::ddl::account::{self, AdminCredential, CreateAccount, Edition};
use frostline_core::suppress;
use frostline_core::{validate, AttributeMap, ProviderError, ProviderResult};
use tracing::{debug, info};

use super::{mark_gone, Resource};
use crate::attrs;
use crate::data::ResourceData;
use crate::schema::{AttributeSchema, ResourceSchema};

const KIND: &str = "account";

fn admin_field(name: &'static str) -> AttributeSchema {
    AttributeSchema::optional(name)
        .force_new()
        .write_only()
        .suppress_with(suppress::import_blank)
}

pub fn account_request(map: &AttributeMap) -> ProviderResult<CreateAccount> {
    let name = validate::account_name(attrs::required_str(map, "name")?)?;
    let admin_name = validate::admin_name(attrs::required_str(map, "admin_name")?)?;
    let email = validate::email(attrs::required_str(map, "email")?)?;

    let password = attrs::optional_non_empty(map, "admin_password")?;
    let rsa_key = attrs::optional_non_empty(map, "admin_rsa_public_key")?;
    let credential = match (password, rsa_key) {
        (Some(password), None) => AdminCredential::Password(password.to_string()),
        (None, Some(key)) => AdminCredential::RsaPublicKey(key.to_string()),
        _ => {
            return Err(ProviderError::invalid(
                "admin_password",
                "exactly one of admin_password or admin_rsa_public_key is required",
            ))
        }
    };

    let owned = |key: &str| -> ProviderResult<Option<String>> {
        Ok(attrs::optional_non_empty(map, key)?.map(str::to_string))
    };
    Ok(CreateAccount {
        name: name.to_string(),
        admin_name: admin_name.to_string(),
        credential,
        first_name: owned("first_name")?,
        last_name: owned("last_name")?,
        email: email.to_string(),
        must_change_password: attrs::optional_bool(map, "must_change_password")?,
        edition: attrs::required_str(map, "edition")?.parse::<Edition>()?,
        region_group: owned("region_group")?,
        region: owned("region")?,
        comment: owned("comment")?,
    })
}

fn write_observed(data: &mut ResourceData, row: AccountRow) {
    data.set("name", row.account_name);
    data.set_opt("edition", row.edition);
    data.set_opt("region_group", row.region_group);
    data.set_opt("region", row.region);
    data.set_opt("comment", row.comment);
    data.set_computed("account_locator", row.account_locator);
    data.set_computed("account_url", row.account_url.unwrap_or_default());
}

pub struct AccountResource;

#[async_trait]
impl Resource for AccountResource {
    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            type_name: KIND,
            version: 0,
            attributes: vec![
                AttributeSchema::required("name")
                    .force_new()
                    .suppress_with(suppress::case_insensitive),
                AttributeSchema {
                    required: true,
                    ..admin_field("admin_name")
                },
                admin_field("admin_password").sensitive(),
                admin_field("admin_rsa_public_key").sensitive(),
                admin_field("first_name"),
                admin_field("last_name"),
                AttributeSchema {
                    required: true,
                    ..admin_field("email")
                },
                admin_field("must_change_password"),
                AttributeSchema::required("edition")
                    .force_new()
                    .suppress_with(suppress::case_insensitive),
                AttributeSchema::optional("region_group")
                    .force_new()
                    .suppress_with(suppress::remote_default),
                AttributeSchema::optional("region")
                    .force_new()
                    .suppress_with(suppress::remote_default),
                AttributeSchema::optional("comment")
                    .force_new()
                    .suppress_with(suppress::blank_as_null),
                AttributeSchema::computed("account_locator"),
                AttributeSchema::computed("account_url"),
            ],
        }
    }

    fn render_create(&self, config: &AttributeMap) -> ProviderResult<String> {
        Ok(account::create(&account_request(config)?))
    }

    async fn create(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let req = account_request(data.desired())?;
        catalog.create_account(&req).await?;

        let row = catalog
            .find_account_by_name(&req.name)
            .await?
            .ok_or_else(|| ProviderError::NotFound {
                object: format!("account {} after creation", req.name),
            })?;
        info!(name = %req.name, locator = %row.account_locator, "created account");
        data.set_id(row.account_locator.clone());
        write_observed(data, row);
        Ok(())
    }

    async fn read(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let Some(row) = catalog.find_account_by_locator(data.id()).await? else {
            return mark_gone(data, KIND);
        };
        write_observed(data, row);
        Ok(())
    }

    async fn update(&self, catalog: &Catalog<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        debug!(id = %data.id(), "accounts have no in-place changes; refreshing");
        data.commit_all();
        self.read(catalog, data).await
    }

    async fn delete(&self, _: &Catalog<'_>, _: &mut ResourceData) -> ProviderResult<()> {
        Err(ProviderError::unsupported(
            "deleting an account",
            "the remote offers no self-service API to drop accounts; contact support to decommission it, then remove it from state",
        ))
    }
}

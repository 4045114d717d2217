//! Account verbs. Accounts live at organization scope and are located through
//! `SHOW ORGANIZATION ACCOUNTS`.

use frostline_core::ddl::account::{self, CreateAccount};
use frostline_core::{ProviderError, ProviderResult};

use crate::catalog::Catalog;
use crate::handle::Row;

/// One row of `SHOW ORGANIZATION ACCOUNTS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRow {
    pub account_name: String,
    pub account_locator: String,
    pub region_group: Option<String>,
    pub region: Option<String>,
    pub edition: Option<String>,
    pub account_url: Option<String>,
    pub comment: Option<String>,
    pub created_on: Option<String>,
}

impl AccountRow {
    pub fn from_row(row: &Row) -> ProviderResult<Self> {
        let field = |name: &str| row.get_non_empty(name).map(str::to_string);
        Ok(Self {
            account_name: field("account_name").ok_or_else(|| missing("account_name"))?,
            account_locator: field("account_locator").ok_or_else(|| missing("account_locator"))?,
            region_group: field("region_group"),
            region: field("snowflake_region"),
            edition: field("edition"),
            account_url: field("account_url"),
            comment: field("comment"),
            created_on: field("created_on"),
        })
    }
}

fn missing(column: &str) -> ProviderError {
    ProviderError::state(format!("account row is missing column {column:?}"))
}

impl Catalog<'_> {
    pub async fn create_account(&self, req: &CreateAccount) -> ProviderResult<()> {
        self.execute_required(&account::create(req), || {
            format!("organization scope for account {}", req.name)
        })
        .await
    }

    pub async fn show_accounts(&self, name_like: Option<&str>) -> ProviderResult<Vec<AccountRow>> {
        let rows = self.fetch(&account::show(name_like)).await?.unwrap_or_default();
        rows.iter().map(AccountRow::from_row).collect()
    }

    /// Account whose name matches `name` ignoring case.
    pub async fn find_account_by_name(&self, name: &str) -> ProviderResult<Option<AccountRow>> {
        let accounts = self.show_accounts(Some(name)).await?;
        Ok(accounts
            .into_iter()
            .find(|a| a.account_name.eq_ignore_ascii_case(name)))
    }

    pub async fn find_account_by_locator(
        &self,
        locator: &str,
    ) -> ProviderResult<Option<AccountRow>> {
        let accounts = self.show_accounts(None).await?;
        Ok(accounts
            .into_iter()
            .find(|a| a.account_locator.eq_ignore_ascii_case(locator)))
    }
}

//! Account statements.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{bool_sql, quote_literal};
use crate::error::ProviderError;
use crate::ident::Ident;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Edition {
    Standard,
    Enterprise,
    BusinessCritical,
}

impl Edition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Enterprise => "ENTERPRISE",
            Self::BusinessCritical => "BUSINESS_CRITICAL",
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Edition {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STANDARD" => Ok(Self::Standard),
            "ENTERPRISE" => Ok(Self::Enterprise),
            "BUSINESS_CRITICAL" => Ok(Self::BusinessCritical),
            other => Err(ProviderError::invalid(
                "edition",
                format!("unknown edition {other:?}"),
            )),
        }
    }
}

/// How the first administrator authenticates. Exactly one is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCredential {
    Password(String),
    RsaPublicKey(String),
}

/// `CREATE ACCOUNT` request.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub name: String,
    pub admin_name: String,
    pub credential: AdminCredential,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub must_change_password: Option<bool>,
    pub edition: Edition,
    pub region_group: Option<String>,
    pub region: Option<String>,
    pub comment: Option<String>,
}

pub fn create(req: &CreateAccount) -> String {
    let mut sql = format!(
        "CREATE ACCOUNT {} ADMIN_NAME = {}",
        Ident::unquoted(req.name.as_str()).to_sql(),
        quote_literal(&req.admin_name)
    );
    match &req.credential {
        AdminCredential::Password(password) => {
            sql.push_str(&format!(" ADMIN_PASSWORD = {}", quote_literal(password)));
        }
        AdminCredential::RsaPublicKey(key) => {
            sql.push_str(&format!(" ADMIN_RSA_PUBLIC_KEY = {}", quote_literal(key)));
        }
    }
    if let Some(first_name) = &req.first_name {
        sql.push_str(&format!(" FIRST_NAME = {}", quote_literal(first_name)));
    }
    if let Some(last_name) = &req.last_name {
        sql.push_str(&format!(" LAST_NAME = {}", quote_literal(last_name)));
    }
    sql.push_str(&format!(" EMAIL = {}", quote_literal(&req.email)));
    if let Some(must_change) = req.must_change_password {
        sql.push_str(&format!(" MUST_CHANGE_PASSWORD = {}", bool_sql(must_change)));
    }
    sql.push_str(&format!(" EDITION = {}", req.edition));
    if let Some(region_group) = &req.region_group {
        sql.push_str(&format!(" REGION_GROUP = {}", quote_literal(region_group)));
    }
    if let Some(region) = &req.region {
        sql.push_str(&format!(" REGION = {}", quote_literal(region)));
    }
    if let Some(comment) = &req.comment {
        sql.push_str(&format!(" COMMENT = {}", quote_literal(comment)));
    }
    sql
}

/// `SHOW ORGANIZATION ACCOUNTS`, optionally narrowed by name.
pub fn show(name_like: Option<&str>) -> String {
    match name_like {
        Some(name) => format!(
            "SHOW ORGANIZATION ACCOUNTS LIKE {}",
            quote_literal(&name.to_ascii_uppercase())
        ),
        None => "SHOW ORGANIZATION ACCOUNTS".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateAccount {
        CreateAccount {
            name: "analytics_eu".to_string(),
            admin_name: "admin".to_string(),
            credential: AdminCredential::Password("Sup3r'Secret".to_string()),
            first_name: None,
            last_name: Some("Doe".to_string()),
            email: "admin@example.com".to_string(),
            must_change_password: Some(true),
            edition: Edition::Enterprise,
            region_group: None,
            region: Some("AWS_EU_CENTRAL_1".to_string()),
            comment: Some("eu tenant".to_string()),
        }
    }

    #[test]
    fn test_create() {
        assert_eq!(
            create(&request()),
            "CREATE ACCOUNT \"ANALYTICS_EU\" ADMIN_NAME = 'admin' ADMIN_PASSWORD = 'Sup3r''Secret' LAST_NAME = 'Doe' EMAIL = 'admin@example.com' MUST_CHANGE_PASSWORD = TRUE EDITION = ENTERPRISE REGION = 'AWS_EU_CENTRAL_1' COMMENT = 'eu tenant'"
        );
    }

    #[test]
    fn test_create_with_rsa_key() {
        let mut req = request();
        req.credential = AdminCredential::RsaPublicKey("MIIBIjAN".to_string());
        req.must_change_password = None;
        let sql = create(&req);
        assert!(sql.contains("ADMIN_RSA_PUBLIC_KEY = 'MIIBIjAN'"));
        assert!(!sql.contains("ADMIN_PASSWORD"));
        assert!(!sql.contains("MUST_CHANGE_PASSWORD"));
    }

    #[test]
    fn test_show() {
        assert_eq!(
            show(Some("analytics_eu")),
            "SHOW ORGANIZATION ACCOUNTS LIKE 'ANALYTICS_EU'"
        );
        assert_eq!(show(None), "SHOW ORGANIZATION ACCOUNTS");
    }

    #[test]
    fn test_edition_parse() {
        assert_eq!("business_critical".parse::<Edition>().unwrap(), Edition::BusinessCritical);
        assert!("gold".parse::<Edition>().is_err());
    }
}

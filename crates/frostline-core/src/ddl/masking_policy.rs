//! Masking policy statements.

use serde::{Deserialize, Serialize};

use super::quote_literal;
use crate::datatype::DataType;
use crate::ident::SchemaObjectIdentifier;

/// One `(name, type)` entry of a policy signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

impl SignatureColumn {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A validated signature entry ready for emission.
#[derive(Debug, Clone)]
pub struct TypedColumn {
    pub name: String,
    pub data_type: DataType,
}

/// `CREATE MASKING POLICY` request.
#[derive(Debug, Clone)]
pub struct CreateMaskingPolicy {
    pub id: SchemaObjectIdentifier,
    pub signature: Vec<TypedColumn>,
    pub return_type: DataType,
    pub body: String,
    pub comment: Option<String>,
    pub exempt_other_policies: bool,
    pub or_replace: bool,
    pub if_not_exists: bool,
}

/// Render `(NAME TYPE, ...)`. Column names are emitted upper-cased and unquoted.
pub fn signature_sql(columns: &[TypedColumn]) -> String {
    let columns: Vec<String> = columns
        .iter()
        .map(|c| format!("{} {}", c.name.to_ascii_uppercase(), c.data_type.to_sql()))
        .collect();
    format!("({})", columns.join(", "))
}

pub fn create(req: &CreateMaskingPolicy) -> String {
    let mut sql = String::from("CREATE ");
    if req.or_replace {
        sql.push_str("OR REPLACE ");
    }
    sql.push_str("MASKING POLICY ");
    if req.if_not_exists {
        sql.push_str("IF NOT EXISTS ");
    }
    sql.push_str(&req.id.fully_qualified());
    sql.push_str(" AS ");
    sql.push_str(&signature_sql(&req.signature));
    sql.push_str(" RETURNS ");
    sql.push_str(&req.return_type.to_sql());
    sql.push_str(" -> ");
    sql.push_str(req.body.trim());
    if let Some(comment) = &req.comment {
        sql.push_str(" COMMENT = ");
        sql.push_str(&quote_literal(comment));
    }
    if req.exempt_other_policies {
        sql.push_str(" EXEMPT_OTHER_POLICIES = TRUE");
    }
    sql
}

/// In-place changes a masking policy accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskingPolicyAlter {
    Rename(SchemaObjectIdentifier),
    SetBody(String),
    SetComment(String),
    UnsetComment,
}

pub fn alter(id: &SchemaObjectIdentifier, change: &MaskingPolicyAlter) -> String {
    let prefix = format!("ALTER MASKING POLICY {}", id.fully_qualified());
    match change {
        MaskingPolicyAlter::Rename(new_id) => {
            format!("{prefix} RENAME TO {}", new_id.fully_qualified())
        }
        MaskingPolicyAlter::SetBody(body) => format!("{prefix} SET BODY -> {}", body.trim()),
        MaskingPolicyAlter::SetComment(comment) => {
            format!("{prefix} SET COMMENT = {}", quote_literal(comment))
        }
        MaskingPolicyAlter::UnsetComment => format!("{prefix} UNSET COMMENT"),
    }
}

pub fn rename(id: &SchemaObjectIdentifier, new_id: &SchemaObjectIdentifier) -> String {
    alter(id, &MaskingPolicyAlter::Rename(new_id.clone()))
}

pub fn set_body(id: &SchemaObjectIdentifier, body: &str) -> String {
    alter(id, &MaskingPolicyAlter::SetBody(body.to_string()))
}

pub fn set_comment(id: &SchemaObjectIdentifier, comment: &str) -> String {
    alter(id, &MaskingPolicyAlter::SetComment(comment.to_string()))
}

pub fn unset_comment(id: &SchemaObjectIdentifier) -> String {
    alter(id, &MaskingPolicyAlter::UnsetComment)
}

pub fn drop(id: &SchemaObjectIdentifier, if_exists: bool) -> String {
    if if_exists {
        format!("DROP MASKING POLICY IF EXISTS {}", id.fully_qualified())
    } else {
        format!("DROP MASKING POLICY {}", id.fully_qualified())
    }
}

pub fn show(id: &SchemaObjectIdentifier) -> String {
    format!(
        "SHOW MASKING POLICIES LIKE {} IN SCHEMA {}",
        quote_literal(&id.name.canonical()),
        id.schema_id().emit_sql()
    )
}

pub fn describe(id: &SchemaObjectIdentifier) -> String {
    format!("DESCRIBE MASKING POLICY {}", id.fully_qualified())
}

//! Tag to masking-policy attachment statements.

use super::quote_literal;
use crate::ident::SchemaObjectIdentifier;

pub fn set_masking_policy(tag: &SchemaObjectIdentifier, policy: &SchemaObjectIdentifier) -> String {
    format!(
        "ALTER TAG {} SET MASKING POLICY {}",
        tag.fully_qualified(),
        policy.fully_qualified()
    )
}

pub fn unset_masking_policy(
    tag: &SchemaObjectIdentifier,
    policy: &SchemaObjectIdentifier,
) -> String {
    format!(
        "ALTER TAG {} UNSET MASKING POLICY {}",
        tag.fully_qualified(),
        policy.fully_qualified()
    )
}

/// Masking policies referenced by `tag`, restricted to `policy`.
pub fn policy_references(tag: &SchemaObjectIdentifier, policy: &SchemaObjectIdentifier) -> String {
    format!(
        "SELECT POLICY_DB, POLICY_SCHEMA, POLICY_NAME, POLICY_KIND \
         FROM TABLE({}.INFORMATION_SCHEMA.POLICY_REFERENCES(REF_ENTITY_NAME => {}, REF_ENTITY_DOMAIN => 'TAG')) \
         WHERE POLICY_KIND = 'MASKING_POLICY' AND POLICY_DB = {} AND POLICY_SCHEMA = {} AND POLICY_NAME = {}",
        tag.database.to_sql(),
        quote_literal(&tag.fully_qualified()),
        quote_literal(&policy.database.canonical()),
        quote_literal(&policy.schema.canonical()),
        quote_literal(&policy.name.canonical()),
    )
}

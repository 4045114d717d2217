//! Table column masking-policy application statements.

use super::quote_literal;
use crate::ident::{SchemaObjectIdentifier, TableColumnIdentifier};

pub fn set_masking_policy(column: &TableColumnIdentifier, policy: &SchemaObjectIdentifier) -> String {
    format!(
        "ALTER TABLE {} MODIFY COLUMN {} SET MASKING POLICY {}",
        column.table.fully_qualified(),
        column.column.value(),
        policy.fully_qualified()
    )
}

pub fn unset_masking_policy(column: &TableColumnIdentifier) -> String {
    format!(
        "ALTER TABLE {} MODIFY COLUMN {} UNSET MASKING POLICY",
        column.table.fully_qualified(),
        column.column.value()
    )
}

/// Masking policy references on the column's table, filtered to the column. A column
/// carries at most one masking policy, so this finds it without knowing which.
pub fn policy_references_for_column(column: &TableColumnIdentifier) -> String {
    format!(
        "SELECT POLICY_DB, POLICY_SCHEMA, POLICY_NAME, POLICY_KIND, REF_COLUMN_NAME \
         FROM TABLE({}.INFORMATION_SCHEMA.POLICY_REFERENCES(REF_ENTITY_NAME => {}, REF_ENTITY_DOMAIN => 'TABLE')) \
         WHERE POLICY_KIND = 'MASKING_POLICY' AND REF_COLUMN_NAME = {}",
        column.table.database.to_sql(),
        quote_literal(&column.table.fully_qualified()),
        quote_literal(&column.column.canonical()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column() -> TableColumnIdentifier {
        TableColumnIdentifier::new(
            SchemaObjectIdentifier::parse_dotted("db.sch.customers").unwrap(),
            "email",
        )
    }

    #[test]
    fn test_apply_and_unapply() {
        let mp = SchemaObjectIdentifier::parse_dotted("db.sch.mask_email").unwrap();
        assert_eq!(
            set_masking_policy(&column(), &mp),
            "ALTER TABLE \"DB\".\"SCH\".\"CUSTOMERS\" MODIFY COLUMN email SET MASKING POLICY \"DB\".\"SCH\".\"MASK_EMAIL\""
        );
        assert_eq!(
            unset_masking_policy(&column()),
            "ALTER TABLE \"DB\".\"SCH\".\"CUSTOMERS\" MODIFY COLUMN email UNSET MASKING POLICY"
        );
    }

    #[test]
    fn test_policy_references_for_column() {
        let sql = policy_references_for_column(&column());
        assert!(sql.contains("FROM TABLE(\"DB\".INFORMATION_SCHEMA.POLICY_REFERENCES("));
        assert!(sql.contains("REF_ENTITY_NAME => '\"DB\".\"SCH\".\"CUSTOMERS\"'"));
        assert!(sql.ends_with("REF_COLUMN_NAME = 'EMAIL'"));
        assert!(!sql.contains("POLICY_NAME ="));
    }
}

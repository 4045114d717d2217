//! Masking policy verbs and SHOW / DESCRIBE parsing.

use frostline_core::ddl::masking_policy::{
    self, CreateMaskingPolicy, MaskingPolicyAlter, SignatureColumn,
};
use frostline_core::{ProviderError, ProviderResult, SchemaObjectIdentifier};
use serde_json::Value;

use crate::catalog::{Applied, Catalog};
use crate::handle::Row;

/// One row of `SHOW MASKING POLICIES`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskingPolicyRow {
    pub name: String,
    pub database_name: String,
    pub schema_name: String,
    pub kind: String,
    pub owner: Option<String>,
    pub comment: Option<String>,
    pub exempt_other_policies: bool,
}

impl MaskingPolicyRow {
    pub fn from_row(row: &Row) -> ProviderResult<Self> {
        Ok(Self {
            name: required(row, "name")?,
            database_name: required(row, "database_name")?,
            schema_name: required(row, "schema_name")?,
            kind: row.get("kind").unwrap_or("MASKING_POLICY").to_string(),
            owner: row.get_non_empty("owner").map(str::to_string),
            comment: row.get_non_empty("comment").map(str::to_string),
            exempt_other_policies: parse_exempt_option(row.get("options"))?,
        })
    }

    pub fn matches(&self, id: &SchemaObjectIdentifier) -> bool {
        self.name == id.name.canonical()
            && self.database_name == id.database.canonical()
            && self.schema_name == id.schema.canonical()
    }
}

/// Output of `DESCRIBE MASKING POLICY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskingPolicyDescription {
    pub name: String,
    pub signature: Vec<SignatureColumn>,
    pub return_type: String,
    pub body: String,
}

impl MaskingPolicyDescription {
    pub fn from_row(row: &Row) -> ProviderResult<Self> {
        Ok(Self {
            name: required(row, "name")?,
            signature: parse_signature(&required(row, "signature")?)?,
            return_type: required(row, "return_type")?,
            body: row.get("body").unwrap_or_default().to_string(),
        })
    }
}

fn required(row: &Row, column: &str) -> ProviderResult<String> {
    row.get(column)
        .map(str::to_string)
        .ok_or_else(|| ProviderError::state(format!("catalog row is missing column {column:?}")))
}

/// `options` is a JSON object such as `{"EXEMPT_OTHER_POLICIES":"true"}`, or empty.
fn parse_exempt_option(options: Option<&str>) -> ProviderResult<bool> {
    let Some(raw) = options.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(false);
    };
    let parsed: Value = serde_json::from_str(raw)?;
    let flag = parsed
        .as_object()
        .and_then(|m| {
            m.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("EXEMPT_OTHER_POLICIES"))
                .map(|(_, v)| v)
        });
    Ok(match flag {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Parse a described signature `(NAME TYPE, NAME TYPE)`. Commas inside type parameters
/// such as `NUMBER(10,2)` do not split entries.
pub fn parse_signature(raw: &str) -> ProviderResult<Vec<SignatureColumn>> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| ProviderError::state(format!("unexpected signature format {raw:?}")))?;

    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                entries.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&inner[start..]);

    entries
        .into_iter()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(|entry| {
            let (name, data_type) = entry
                .split_once(char::is_whitespace)
                .ok_or_else(|| ProviderError::state(format!("signature entry {entry:?} has no type")))?;
            Ok(SignatureColumn::new(name.trim(), data_type.trim()))
        })
        .collect()
}

impl Catalog<'_> {
    pub async fn create_mp(&self, req: &CreateMaskingPolicy) -> ProviderResult<()> {
        self.execute_required(&masking_policy::create(req), || {
            format!("schema {}", req.id.schema_id().emit_sql())
        })
        .await
    }

    pub async fn alter_mp(
        &self,
        id: &SchemaObjectIdentifier,
        change: &MaskingPolicyAlter,
    ) -> ProviderResult<Applied> {
        self.execute(&masking_policy::alter(id, change)).await
    }

    pub async fn drop_mp(&self, id: &SchemaObjectIdentifier) -> ProviderResult<Applied> {
        let if_exists = self.context().config().drop_if_exists;
        self.execute(&masking_policy::drop(id, if_exists)).await
    }

    /// The SHOW row for `id`, if the policy exists.
    pub async fn show_mp(
        &self,
        id: &SchemaObjectIdentifier,
    ) -> ProviderResult<Option<MaskingPolicyRow>> {
        let Some(rows) = self.fetch(&masking_policy::show(id)).await? else {
            return Ok(None);
        };
        // LIKE treats `_` as a wildcard, so more than one row can come back.
        for row in &rows {
            let parsed = MaskingPolicyRow::from_row(row)?;
            if parsed.matches(id) {
                return Ok(Some(parsed));
            }
        }
        Ok(None)
    }

    pub async fn describe_mp(
        &self,
        id: &SchemaObjectIdentifier,
    ) -> ProviderResult<Option<MaskingPolicyDescription>> {
        let Some(rows) = self.fetch(&masking_policy::describe(id)).await? else {
            return Ok(None);
        };
        rows.first().map(MaskingPolicyDescription::from_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signature_simple() {
        let sig = parse_signature("(VAL VARCHAR)").unwrap();
        assert_eq!(sig, vec![SignatureColumn::new("VAL", "VARCHAR")]);
    }

    #[test]
    fn test_parse_signature_with_parameterized_types() {
        let sig = parse_signature("(AMOUNT NUMBER(10,2), LABEL VARCHAR(16777216), TS TIMESTAMP_NTZ(9))")
            .unwrap();
        assert_eq!(
            sig,
            vec![
                SignatureColumn::new("AMOUNT", "NUMBER(10,2)"),
                SignatureColumn::new("LABEL", "VARCHAR(16777216)"),
                SignatureColumn::new("TS", "TIMESTAMP_NTZ(9)"),
            ]
        );
    }

    #[test]
    fn test_parse_signature_rejects_garbage() {
        assert!(parse_signature("VAL VARCHAR").is_err());
        assert!(parse_signature("(VAL)").is_err());
        assert_eq!(parse_signature("()").unwrap(), vec![]);
    }

    #[test]
    fn test_exempt_option() {
        assert!(!parse_exempt_option(None).unwrap());
        assert!(!parse_exempt_option(Some("")).unwrap());
        assert!(parse_exempt_option(Some(r#"{"EXEMPT_OTHER_POLICIES":"true"}"#)).unwrap());
        assert!(parse_exempt_option(Some(r#"{"exempt_other_policies":true}"#)).unwrap());
        assert!(!parse_exempt_option(Some(r#"{"EXEMPT_OTHER_POLICIES":"false"}"#)).unwrap());
        assert!(parse_exempt_option(Some("{not json")).is_err());
    }

    #[test]
    fn test_show_row_matching_is_exact() {
        let row = Row::new()
            .with("name", "policy_name")
            .with("database_name", "database_name")
            .with("schema_name", "schema_name")
            .with("kind", "MASKING_POLICY")
            .with("comment", "");
        let parsed = MaskingPolicyRow::from_row(&row).unwrap();
        assert_eq!(parsed.comment, None);
        assert!(parsed.matches(&SchemaObjectIdentifier::new(
            "database_name",
            "schema_name",
            "policy_name"
        )));
        assert!(!parsed.matches(&SchemaObjectIdentifier::new(
            "database_name",
            "schema_name",
            "policyXname"
        )));
    }
}

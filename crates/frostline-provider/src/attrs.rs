//! Typed extraction from untyped attribute maps.

use frostline_core::ddl::masking_policy::SignatureColumn;
use frostline_core::{validate, AttributeMap, ProviderError, ProviderResult};
use serde_json::Value;

pub fn optional_str<'a>(map: &'a AttributeMap, key: &str) -> ProviderResult<Option<&'a str>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ProviderError::invalid(
            key,
            format!("expected a string, got {other}"),
        )),
    }
}

pub fn required_str<'a>(map: &'a AttributeMap, key: &str) -> ProviderResult<&'a str> {
    let value = optional_str(map, key)?.ok_or_else(|| ProviderError::invalid(key, "is required"))?;
    validate::non_empty(key, value)
}

/// Optional string where an empty value means unset.
pub fn optional_non_empty<'a>(map: &'a AttributeMap, key: &str) -> ProviderResult<Option<&'a str>> {
    Ok(optional_str(map, key)?.filter(|s| !s.is_empty()))
}

pub fn bool_or(map: &AttributeMap, key: &str, default: bool) -> ProviderResult<bool> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
        Some(other) => Err(ProviderError::invalid(
            key,
            format!("expected a boolean, got {other}"),
        )),
    }
}

pub fn optional_bool(map: &AttributeMap, key: &str) -> ProviderResult<Option<bool>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => bool_or(map, key, false).map(Some),
    }
}

pub fn signature(map: &AttributeMap, key: &str) -> ProviderResult<Vec<SignatureColumn>> {
    let value = map
        .get(key)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ProviderError::invalid(key, "is required"))?;
    serde_json::from_value(value.clone()).map_err(|e| {
        ProviderError::invalid(key, format!("expected a list of {{name, type}} entries: {e}"))
    })
}

pub fn signature_value(columns: &[SignatureColumn]) -> Value {
    Value::Array(
        columns
            .iter()
            .map(|c| serde_json::json!({ "name": c.name, "type": c.data_type }))
            .collect(),
    )
}

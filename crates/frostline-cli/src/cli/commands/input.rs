//! Reading resource documents from disk.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use frostline_core::AttributeMap;
use serde_json::Value;

/// Load a YAML mapping of attribute name to value.
pub fn read_attributes(path: &Path) -> anyhow::Result<AttributeMap> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse YAML in {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(AttributeMap::new()),
        other => bail!(
            "{} must contain a mapping of attributes, found {}",
            path.display(),
            kind_name(&other)
        ),
    }
}

pub fn read_state(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read state {}", path.display()))
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

//! Input validation run before anything is dispatched.

use lazy_static::lazy_static;
use regex::Regex;

use crate::datatype::DataType;
use crate::ddl::masking_policy::{SignatureColumn, TypedColumn};
use crate::error::{ProviderError, ProviderResult};

lazy_static! {
    static ref ACCOUNT_NAME: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap();
    static ref COLUMN_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").unwrap();
    static ref EMAIL: Regex = Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").unwrap();
}

pub fn non_empty<'a>(attribute: &str, value: &'a str) -> ProviderResult<&'a str> {
    if value.trim().is_empty() {
        return Err(ProviderError::invalid(attribute, "must not be empty"));
    }
    Ok(value)
}

/// Parse a data-type attribute, reporting failures against `attribute`.
pub fn data_type(attribute: &str, value: &str) -> ProviderResult<DataType> {
    DataType::parse(value).map_err(|err| match err {
        ProviderError::InvalidAttribute { reason, .. } => ProviderError::invalid(attribute, reason),
        other => other,
    })
}

/// Letter first, then letters, digits or underscores.
pub fn account_name(value: &str) -> ProviderResult<&str> {
    if !ACCOUNT_NAME.is_match(value) {
        return Err(ProviderError::invalid(
            "name",
            format!("{value:?} must start with a letter and contain only letters, digits and underscores"),
        ));
    }
    Ok(value)
}

pub fn admin_name(value: &str) -> ProviderResult<&str> {
    if !ACCOUNT_NAME.is_match(value) {
        return Err(ProviderError::invalid(
            "admin_name",
            format!("{value:?} must start with a letter and contain only letters, digits and underscores"),
        ));
    }
    Ok(value)
}

pub fn email(value: &str) -> ProviderResult<&str> {
    if !EMAIL.is_match(value) {
        return Err(ProviderError::invalid(
            "email",
            format!("{value:?} is not an address of the form user@domain"),
        ));
    }
    Ok(value)
}

/// Bare column name: letter or underscore first, then letters, digits, `_` or `$`.
/// Statements emit column names unquoted, so nothing else is accepted.
pub fn column_name<'a>(attribute: &str, value: &'a str) -> ProviderResult<&'a str> {
    if !COLUMN_NAME.is_match(value) {
        return Err(ProviderError::invalid(
            attribute,
            format!("{value:?} is not a valid column name"),
        ));
    }
    Ok(value)
}

/// At least one column; bare column names; every type parses.
pub fn signature(columns: &[SignatureColumn]) -> ProviderResult<Vec<TypedColumn>> {
    if columns.is_empty() {
        return Err(ProviderError::invalid(
            "signature",
            "must declare at least one column",
        ));
    }
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            column_name(&format!("signature.{i}.name"), &column.name)?;
            let data_type = data_type(&format!("signature.{i}.type"), &column.data_type)?;
            Ok(TypedColumn {
                name: column.name.clone(),
                data_type,
            })
        })
        .collect()
}

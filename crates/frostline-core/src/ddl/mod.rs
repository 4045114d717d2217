//! SQL text synthesis.
//!
//! Every function here is pure: equal inputs give byte-equal output. Identifiers always go
//! through [`crate::ident`], string literals through [`quote_literal`].

pub mod account;
pub mod column;
pub mod masking_policy;
pub mod tag;

/// Single-quote a string literal, doubling embedded quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Booleans render as `TRUE` / `FALSE`.
pub fn bool_sql(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

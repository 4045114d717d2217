//! Diff-suppression predicates.
//!
//! Each predicate answers "is (old, new) the same value for planning purposes?". They share
//! one signature so attribute schemas can hold them as plain function pointers.

use serde_json::Value;

use crate::datatype;
use crate::ident::{Ident, SchemaObjectIdentifier};

/// What a predicate may know besides the two values.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuppressContext<'a> {
    /// Id of the managed object; empty on first create.
    pub id: &'a str,
}

pub type SuppressFn = fn(&SuppressContext<'_>, &Value, &Value) -> bool;

fn text(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        _ => None,
    }
}

/// Strip leading and trailing whitespace from every line, and blank lines at either end.
pub fn normalize_body(body: &str) -> String {
    body.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// `VARCHAR` ≡ `VARCHAR(16777216)`, `NUMBER` ≡ `NUMBER(38,0)`, ...
pub fn data_type(_: &SuppressContext<'_>, old: &Value, new: &Value) -> bool {
    match (text(old), text(new)) {
        (Some(old), Some(new)) => datatype::equivalent(old, new),
        _ => old == new,
    }
}

/// Body text compared modulo per-line surrounding whitespace.
pub fn trimmed_body(_: &SuppressContext<'_>, old: &Value, new: &Value) -> bool {
    match (text(old), text(new)) {
        (Some(old), Some(new)) => normalize_body(old) == normalize_body(new),
        _ => old == new,
    }
}

/// A blank prior value on an existing object means it was imported and the remote never
/// told us the value. Fresh creates (empty id) still show the diff.
pub fn import_blank(ctx: &SuppressContext<'_>, old: &Value, _: &Value) -> bool {
    let blank = match old {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    blank && !ctx.id.is_empty()
}

/// `""`, null and absent all mean "no value".
pub fn blank_as_null(_: &SuppressContext<'_>, old: &Value, new: &Value) -> bool {
    let blank = |v: &Value| v.is_null() || v.as_str() == Some("");
    (blank(old) && blank(new)) || old == new
}

/// Creation-only modifiers are not observable on the remote.
pub fn write_only_flag(_: &SuppressContext<'_>, _: &Value, _: &Value) -> bool {
    true
}

/// Dotted three-part references compared with identifier semantics.
pub fn identifier(_: &SuppressContext<'_>, old: &Value, new: &Value) -> bool {
    match (text(old), text(new)) {
        (Some(old), Some(new)) => match (
            SchemaObjectIdentifier::parse_dotted(old),
            SchemaObjectIdentifier::parse_dotted(new),
        ) {
            (Ok(old), Ok(new)) => old == new,
            _ => old == new,
        },
        _ => old == new,
    }
}

/// Bare column names fold like the remote does; anything else compares exactly.
pub fn column_name(_: &SuppressContext<'_>, old: &Value, new: &Value) -> bool {
    match (text(old), text(new)) {
        (Some(old), Some(new)) => Ident::column(old) == Ident::column(new),
        _ => old == new,
    }
}

/// Keywords and unquoted names the remote reports upper-cased.
pub fn case_insensitive(_: &SuppressContext<'_>, old: &Value, new: &Value) -> bool {
    match (text(old), text(new)) {
        (Some(old), Some(new)) => old.eq_ignore_ascii_case(new),
        _ => old == new,
    }
}

/// Omitting an optional attribute accepts whatever the remote chose.
pub fn remote_default(_: &SuppressContext<'_>, _: &Value, new: &Value) -> bool {
    new.is_null()
}

/// Signatures compared position by position: names case-insensitively, types by
/// data-type equivalence.
pub fn signature(_: &SuppressContext<'_>, old: &Value, new: &Value) -> bool {
    let (Some(old), Some(new)) = (old.as_array(), new.as_array()) else {
        return old == new;
    };
    old.len() == new.len()
        && old.iter().zip(new).all(|(a, b)| {
            let name = |v: &Value| v.get("name").and_then(Value::as_str).map(str::to_owned);
            let ty = |v: &Value| v.get("type").and_then(Value::as_str).map(str::to_owned);
            match (name(a), name(b), ty(a), ty(b)) {
                (Some(na), Some(nb), Some(ta), Some(tb)) => {
                    na.eq_ignore_ascii_case(&nb) && datatype::equivalent(&ta, &tb)
                }
                _ => a == b,
            }
        })
}

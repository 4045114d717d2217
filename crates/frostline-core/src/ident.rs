//! Object identifiers and their encodings.
//!
//! Three textual forms are in play:
//! - `db|schema|object[|column]` (pipe form): the durable primary key kept in state;
//! - `"db"."schema"."object"` (SQL form): every part double-quoted, used in generated DDL;
//! - `db.schema.object[.column]` (dotted form): what users write in configuration.
//!
//! Parts written without quotes in dotted form follow the remote's default folding and
//! compare case-insensitively. Quoted parts, and every part of the pipe form, are exact.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ProviderError, ProviderResult};

const PIPE: char = '|';
const DOT: char = '.';

lazy_static! {
    static ref SIMPLE_TOKEN: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").unwrap();
    static ref FOLDED_TOKEN: Regex = Regex::new(r"^[A-Z_][A-Z0-9_$]*$").unwrap();
}

/// A single identifier part.
#[derive(Debug, Clone)]
pub struct Ident {
    value: String,
    quoted: bool,
}

impl Ident {
    /// An exact (case-preserving) name.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: true,
        }
    }

    /// A bare token subject to upper-case folding.
    pub fn unquoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
        }
    }

    /// Column names arrive unquoted from configuration; keep bare tokens foldable and
    /// anything else exact.
    pub fn column(value: &str) -> Self {
        if SIMPLE_TOKEN.is_match(value) {
            Self::unquoted(value)
        } else {
            Self::new(value)
        }
    }

    /// The name as written.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// The name the remote resolves this part to.
    pub fn canonical(&self) -> Cow<'_, str> {
        if self.quoted {
            Cow::Borrowed(&self.value)
        } else {
            Cow::Owned(self.value.to_ascii_uppercase())
        }
    }

    /// Double-quoted SQL form with embedded quotes doubled.
    pub fn to_sql(&self) -> String {
        format!("\"{}\"", self.canonical().replace('"', "\"\""))
    }

    /// Bare unless the part holds a separator, a quote, or edge whitespace that parsing
    /// would trim.
    fn to_pipe_part(&self) -> String {
        let canonical = self.canonical();
        if canonical.contains(PIPE) || canonical.contains('"') || canonical.trim() != canonical {
            format!("\"{}\"", canonical.replace('"', "\"\""))
        } else {
            canonical.into_owned()
        }
    }

    fn to_dotted_part(&self) -> String {
        let canonical = self.canonical();
        if FOLDED_TOKEN.is_match(&canonical) {
            canonical.into_owned()
        } else {
            format!("\"{}\"", canonical.replace('"', "\"\""))
        }
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Ident {}

impl Hash for Ident {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Split `input` on unquoted occurrences of `sep`.
///
/// A segment that starts with `"` runs to the matching closing quote; `""` inside it is an
/// escaped quote. Bare segments become exact names when `bare_exact` is set (pipe form) and
/// folding tokens otherwise (dotted form).
fn split_parts(input: &str, sep: char, bare_exact: bool) -> ProviderResult<Vec<Ident>> {
    let mut parts = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        if chars.peek() == Some(&'"') {
            chars.next();
            let mut value = String::new();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        value.push('"');
                    }
                    Some('"') => break,
                    Some(c) => value.push(c),
                    None => return Err(ProviderError::malformed(input, "unterminated quote")),
                }
            }
            if value.is_empty() {
                return Err(ProviderError::malformed(input, "empty identifier part"));
            }
            parts.push(Ident::new(value));
        } else {
            let mut value = String::new();
            while let Some(&c) = chars.peek() {
                if c == sep {
                    break;
                }
                if c == '"' {
                    return Err(ProviderError::malformed(
                        input,
                        "unexpected quote inside unquoted part",
                    ));
                }
                value.push(c);
                chars.next();
            }
            if value.is_empty() {
                return Err(ProviderError::malformed(input, "empty identifier part"));
            }
            if bare_exact {
                parts.push(Ident::new(value));
            } else {
                if !SIMPLE_TOKEN.is_match(&value) {
                    return Err(ProviderError::malformed(
                        input,
                        format!("{value:?} must be quoted"),
                    ));
                }
                parts.push(Ident::unquoted(value));
            }
        }

        match chars.next() {
            None => break,
            Some(c) if c == sep => {
                if chars.peek().is_none() {
                    return Err(ProviderError::malformed(input, "empty identifier part"));
                }
            }
            Some(c) => {
                return Err(ProviderError::malformed(
                    input,
                    format!("unexpected {c:?} after quoted part"),
                ))
            }
        }
    }

    Ok(parts)
}

fn expect_parts(
    input: &str,
    sep: char,
    bare_exact: bool,
    count: usize,
) -> ProviderResult<Vec<Ident>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ProviderError::malformed(input, "empty identifier"));
    }
    let parts = split_parts(input, sep, bare_exact)?;
    if parts.len() != count {
        return Err(ProviderError::malformed(
            input,
            format!("expected {count} parts, got {}", parts.len()),
        ));
    }
    Ok(parts)
}

fn join_pipe(parts: &[&Ident]) -> String {
    parts
        .iter()
        .map(|p| p.to_pipe_part())
        .collect::<Vec<_>>()
        .join("|")
}

fn join_sql(parts: &[&Ident]) -> String {
    parts
        .iter()
        .map(|p| p.to_sql())
        .collect::<Vec<_>>()
        .join(".")
}

fn join_dotted(parts: &[&Ident]) -> String {
    parts
        .iter()
        .map(|p| p.to_dotted_part())
        .collect::<Vec<_>>()
        .join(".")
}

/// `database.schema`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaIdentifier {
    pub database: Ident,
    pub schema: Ident,
}

impl SchemaIdentifier {
    pub fn emit_sql(&self) -> String {
        join_sql(&[&self.database, &self.schema])
    }
}

impl fmt::Display for SchemaIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.emit_sql())
    }
}

/// Three-part identifier naming a schema-scoped object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaObjectIdentifier {
    pub database: Ident,
    pub schema: Ident,
    pub name: Ident,
}

impl SchemaObjectIdentifier {
    /// Build from exact names, as supplied by configuration.
    pub fn new(database: &str, schema: &str, name: &str) -> Self {
        Self {
            database: Ident::new(database),
            schema: Ident::new(schema),
            name: Ident::new(name),
        }
    }

    /// Parse `db|schema|object`.
    pub fn parse_pipe(input: &str) -> ProviderResult<Self> {
        let mut parts = expect_parts(input, PIPE, true, 3)?.into_iter();
        Ok(Self::from_parts(&mut parts))
    }

    /// Parse `db.schema.object`, with optional double-quoted parts.
    pub fn parse_dotted(input: &str) -> ProviderResult<Self> {
        let mut parts = expect_parts(input, DOT, false, 3)?.into_iter();
        Ok(Self::from_parts(&mut parts))
    }

    fn from_parts(parts: &mut impl Iterator<Item = Ident>) -> Self {
        // Callers have already checked the part count.
        let mut next = || parts.next().unwrap_or_else(|| Ident::new(""));
        Self {
            database: next(),
            schema: next(),
            name: next(),
        }
    }

    pub fn emit_sql(&self) -> String {
        join_sql(&[&self.database, &self.schema, &self.name])
    }

    /// Same as [`Self::emit_sql`] for three-part names.
    pub fn fully_qualified(&self) -> String {
        self.emit_sql()
    }

    pub fn emit_pipe(&self) -> String {
        join_pipe(&[&self.database, &self.schema, &self.name])
    }

    pub fn emit_dotted(&self) -> String {
        join_dotted(&[&self.database, &self.schema, &self.name])
    }

    pub fn schema_id(&self) -> SchemaIdentifier {
        SchemaIdentifier {
            database: self.database.clone(),
            schema: self.schema.clone(),
        }
    }

    /// Same container, different object name.
    pub fn with_name(&self, name: &str) -> Self {
        Self {
            database: self.database.clone(),
            schema: self.schema.clone(),
            name: Ident::new(name),
        }
    }
}

impl fmt::Display for SchemaObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.emit_sql())
    }
}

impl std::str::FromStr for SchemaObjectIdentifier {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_pipe(s)
    }
}

/// Four-part identifier of a table column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableColumnIdentifier {
    pub table: SchemaObjectIdentifier,
    pub column: Ident,
}

impl TableColumnIdentifier {
    pub fn new(table: SchemaObjectIdentifier, column: &str) -> Self {
        Self {
            table,
            column: Ident::column(column),
        }
    }

    /// Parse `db|schema|table|column`.
    pub fn parse_pipe(input: &str) -> ProviderResult<Self> {
        let parts = expect_parts(input, PIPE, true, 4)?;
        Ok(Self::from_vec(parts))
    }

    /// Parse `db.schema.table.column`.
    pub fn parse_dotted(input: &str) -> ProviderResult<Self> {
        let parts = expect_parts(input, DOT, false, 4)?;
        Ok(Self::from_vec(parts))
    }

    fn from_vec(parts: Vec<Ident>) -> Self {
        let mut parts = parts.into_iter();
        let table = SchemaObjectIdentifier::from_parts(&mut parts);
        let column = parts.next().unwrap_or_else(|| Ident::new(""));
        Self { table, column }
    }

    pub fn emit_sql(&self) -> String {
        join_sql(&[
            &self.table.database,
            &self.table.schema,
            &self.table.name,
            &self.column,
        ])
    }

    pub fn emit_pipe(&self) -> String {
        join_pipe(&[
            &self.table.database,
            &self.table.schema,
            &self.table.name,
            &self.column,
        ])
    }

    /// The persisted id of a column masking-policy application.
    pub fn emit_dotted(&self) -> String {
        join_dotted(&[
            &self.table.database,
            &self.table.schema,
            &self.table.name,
            &self.column,
        ])
    }
}

impl fmt::Display for TableColumnIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.emit_sql())
    }
}

/// Pair of (tag, masking policy) naming a tag attachment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagMaskingPolicyIdentifier {
    pub tag: SchemaObjectIdentifier,
    pub policy: SchemaObjectIdentifier,
}

impl TagMaskingPolicyIdentifier {
    pub fn new(tag: SchemaObjectIdentifier, policy: SchemaObjectIdentifier) -> Self {
        Self { tag, policy }
    }

    /// Parse `tag_db|tag_schema|tag|mp_db|mp_schema|mp`.
    pub fn parse_pipe(input: &str) -> ProviderResult<Self> {
        let mut parts = expect_parts(input, PIPE, true, 6)?.into_iter();
        let tag = SchemaObjectIdentifier::from_parts(&mut parts);
        let policy = SchemaObjectIdentifier::from_parts(&mut parts);
        Ok(Self { tag, policy })
    }

    pub fn emit_pipe(&self) -> String {
        format!("{}|{}", self.tag.emit_pipe(), self.policy.emit_pipe())
    }
}

impl fmt::Display for TagMaskingPolicyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.emit_pipe())
    }
}

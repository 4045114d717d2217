//! Statement redaction.
//!
//! Write-only credentials appear as string literals in `CREATE ACCOUNT`. Anything that
//! leaves the engine as text (log events, error messages) passes through [`redact_statement`].

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

const REDACTED: &str = "'[REDACTED]'";

lazy_static! {
    /// `KEY = '<literal>'` for secret-bearing keys; `''` is an escaped quote inside the literal.
    static ref SECRET_LITERAL: Regex =
        Regex::new(r"(?i)\b(ADMIN_PASSWORD|ADMIN_RSA_PUBLIC_KEY)(\s*=\s*)'(?:[^']|'')*'").unwrap();
}

pub fn redact_statement(statement: &str) -> Cow<'_, str> {
    SECRET_LITERAL.replace_all(statement, format!("${{1}}${{2}}{REDACTED}").as_str())
}

//! The SQL handle seam between the adapter and a warehouse session.

use std::collections::BTreeMap;

use async_trait::async_trait;

/// Error code the warehouse returns for "does not exist or not authorized".
pub const OBJECT_DOES_NOT_EXIST: &str = "002003";

/// Failure reported by the remote for one statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    pub code: Option<String>,
    pub sql_state: Option<String>,
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            sql_state: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_sql_state(mut self, sql_state: impl Into<String>) -> Self {
        self.sql_state = Some(sql_state.into());
        self
    }

    /// Shorthand for the error a missing object produces.
    pub fn does_not_exist(object: &str) -> Self {
        Self::new(format!(
            "SQL compilation error:\n{object} does not exist or not authorized."
        ))
        .with_code(OBJECT_DOES_NOT_EXIST)
        .with_sql_state("02000")
    }

    pub fn is_object_does_not_exist(&self) -> bool {
        self.code.as_deref() == Some(OBJECT_DOES_NOT_EXIST)
            || self.message.contains("does not exist or not authorized")
    }
}

/// One result row. Column lookup ignores case; SHOW output is lower-case while
/// INFORMATION_SCHEMA output is upper-case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: BTreeMap<String, Option<String>>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<String>) -> Self {
        self.columns
            .insert(column.to_ascii_lowercase(), Some(value.into()));
        self
    }

    pub fn with_null(mut self, column: &str) -> Self {
        self.columns.insert(column.to_ascii_lowercase(), None);
        self
    }

    /// `None` for both absent columns and SQL NULL.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .get(&column.to_ascii_lowercase())
            .and_then(|v| v.as_deref())
    }

    /// Like [`Row::get`] but treats empty strings as absent.
    pub fn get_non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Row::new(), |row, (k, v)| row.with(k.as_ref(), v))
    }
}

/// An authenticated session capable of running statements.
///
/// Implementations must be safe to share across concurrent resource operations.
#[async_trait]
pub trait SqlHandle: Send + Sync {
    /// Run a statement that returns no rows.
    async fn exec(&self, statement: &str) -> Result<(), RemoteError>;

    /// Run a statement and collect every row.
    async fn query(&self, statement: &str) -> Result<Vec<Row>, RemoteError>;
}

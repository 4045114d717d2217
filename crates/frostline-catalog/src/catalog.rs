//! Statement dispatch shared by every adapter verb.
//!
//! Each dispatch checks cancellation first and maps remote failures into [`ProviderError::RemoteExecution`] carrying the
//! redacted statement. "Does not exist or not authorized" is not an error at this layer:
//! mutations report it as [`Applied::ObjectMissing`] and queries as `None`.
//!
//! Only queries are bounded by the configured timeout. A mutation runs to completion
//! once dispatched, since dropping it would leave its remote outcome unknown.

use frostline_core::{redact_statement, ProviderError, ProviderResult};
use tracing::debug;

use crate::context::Context;
use crate::handle::{RemoteError, Row, SqlHandle};

/// Outcome of a mutating statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Executed,
    /// The remote reported the target as absent.
    ObjectMissing,
}

impl Applied {
    pub fn is_missing(self) -> bool {
        matches!(self, Applied::ObjectMissing)
    }
}

/// Typed verbs over a [`SqlHandle`].
#[derive(Clone, Copy)]
pub struct Catalog<'a> {
    handle: &'a dyn SqlHandle,
    ctx: &'a Context,
}

impl<'a> Catalog<'a> {
    pub fn new(handle: &'a dyn SqlHandle, ctx: &'a Context) -> Self {
        Self { handle, ctx }
    }

    pub fn context(&self) -> &'a Context {
        self.ctx
    }

    pub(crate) async fn execute(&self, statement: &str) -> ProviderResult<Applied> {
        self.ctx.check()?;
        self.log(statement);
        match self.handle.exec(statement).await {
            Ok(()) => Ok(Applied::Executed),
            Err(e) if e.is_object_does_not_exist() => Ok(Applied::ObjectMissing),
            Err(e) => Err(remote_failure(statement, e)),
        }
    }

    /// Execute a statement whose target must exist; absence becomes `NotFound`.
    pub(crate) async fn execute_required(
        &self,
        statement: &str,
        object: impl FnOnce() -> String,
    ) -> ProviderResult<()> {
        match self.execute(statement).await? {
            Applied::Executed => Ok(()),
            Applied::ObjectMissing => Err(ProviderError::NotFound { object: object() }),
        }
    }

    /// `None` when the queried object does not exist.
    pub(crate) async fn fetch(&self, statement: &str) -> ProviderResult<Option<Vec<Row>>> {
        self.ctx.check()?;
        self.log(statement);
        let outcome = match self.ctx.config().query_timeout() {
            Some(limit) => tokio::time::timeout(limit, self.handle.query(statement))
                .await
                .map_err(|_| self.timed_out(statement))?,
            None => self.handle.query(statement).await,
        };
        match outcome {
            Ok(rows) => Ok(Some(rows)),
            Err(e) if e.is_object_does_not_exist() => Ok(None),
            Err(e) => Err(remote_failure(statement, e)),
        }
    }

    fn log(&self, statement: &str) {
        if self.ctx.config().log_statements {
            debug!(statement = %redact_statement(statement), "dispatching statement");
        }
    }

    fn timed_out(&self, statement: &str) -> ProviderError {
        ProviderError::RemoteExecution {
            statement: redact_statement(statement).into_owned(),
            code: None,
            message: format!(
                "query timed out after {}s",
                self.ctx.config().query_timeout_secs
            ),
        }
    }
}

pub(crate) fn remote_failure(statement: &str, err: RemoteError) -> ProviderError {
    ProviderError::RemoteExecution {
        statement: redact_statement(statement).into_owned(),
        code: err.code,
        message: err.message,
    }
}

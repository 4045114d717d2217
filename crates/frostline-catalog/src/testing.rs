//! In-memory [`SqlHandle`] for tests.
//!
//! Responses are keyed by statement prefix. The most recently registered matching
//! script wins, so a test can set a default and override it. `*_once` scripts are
//! consumed by their first match. Statements with no matching script succeed with no
//! rows.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::handle::{RemoteError, Row, SqlHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Exec(String),
    Query(String),
}

impl Dispatched {
    pub fn statement(&self) -> &str {
        match self {
            Dispatched::Exec(s) | Dispatched::Query(s) => s,
        }
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Rows(Vec<Row>),
    Fail(RemoteError),
}

#[derive(Debug)]
struct Script {
    prefix: String,
    reply: Reply,
    once: bool,
}

#[derive(Debug, Default)]
pub struct ScriptedHandle {
    scripts: Mutex<Vec<Script>>,
    log: Mutex<Vec<Dispatched>>,
}

impl ScriptedHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, prefix: &str, reply: Reply, once: bool) {
        self.scripts.lock().unwrap().push(Script {
            prefix: prefix.to_string(),
            reply,
            once,
        });
    }

    /// Queries starting with `prefix` return `rows`.
    pub fn on_query(&self, prefix: &str, rows: Vec<Row>) -> &Self {
        self.push(prefix, Reply::Rows(rows), false);
        self
    }

    pub fn on_query_once(&self, prefix: &str, rows: Vec<Row>) -> &Self {
        self.push(prefix, Reply::Rows(rows), true);
        self
    }

    /// Any statement starting with `prefix` fails with `err`.
    pub fn fail(&self, prefix: &str, err: RemoteError) -> &Self {
        self.push(prefix, Reply::Fail(err), false);
        self
    }

    pub fn fail_once(&self, prefix: &str, err: RemoteError) -> &Self {
        self.push(prefix, Reply::Fail(err), true);
        self
    }

    /// Every dispatched statement, in order.
    pub fn dispatched(&self) -> Vec<Dispatched> {
        self.log.lock().unwrap().clone()
    }

    /// Statements sent through `exec`, in order.
    pub fn executed(&self) -> Vec<String> {
        self.dispatched()
            .into_iter()
            .filter_map(|d| match d {
                Dispatched::Exec(s) => Some(s),
                Dispatched::Query(_) => None,
            })
            .collect()
    }

    /// Statements sent through `query`, in order.
    pub fn queried(&self) -> Vec<String> {
        self.dispatched()
            .into_iter()
            .filter_map(|d| match d {
                Dispatched::Query(s) => Some(s),
                Dispatched::Exec(_) => None,
            })
            .collect()
    }

    fn reply_for(&self, statement: &str) -> Option<Reply> {
        let mut scripts = self.scripts.lock().unwrap();
        let idx = scripts
            .iter()
            .rposition(|s| statement.starts_with(&s.prefix))?;
        if scripts[idx].once {
            Some(scripts.remove(idx).reply)
        } else {
            Some(scripts[idx].reply.clone())
        }
    }
}

#[async_trait]
impl SqlHandle for ScriptedHandle {
    async fn exec(&self, statement: &str) -> Result<(), RemoteError> {
        self.log
            .lock()
            .unwrap()
            .push(Dispatched::Exec(statement.to_string()));
        match self.reply_for(statement) {
            Some(Reply::Fail(err)) => Err(err),
            _ => Ok(()),
        }
    }

    async fn query(&self, statement: &str) -> Result<Vec<Row>, RemoteError> {
        self.log
            .lock()
            .unwrap()
            .push(Dispatched::Query(statement.to_string()));
        match self.reply_for(statement) {
            Some(Reply::Fail(err)) => Err(err),
            Some(Reply::Rows(rows)) => Ok(rows),
            None => Ok(Vec::new()),
        }
    }
}

/// A handle whose every statement hangs until dropped. Used to exercise timeouts.
#[derive(Debug, Default)]
pub struct StalledHandle;

#[async_trait]
impl SqlHandle for StalledHandle {
    async fn exec(&self, _statement: &str) -> Result<(), RemoteError> {
        std::future::pending().await
    }

    async fn query(&self, _statement: &str) -> Result<Vec<Row>, RemoteError> {
        std::future::pending().await
    }
}

/// A handle whose statements succeed after `delay`, returning no rows.
#[derive(Debug, Default)]
pub struct SlowHandle {
    pub delay: Duration,
    executed: Mutex<Vec<String>>,
}

impl SlowHandle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            executed: Mutex::default(),
        }
    }

    /// Mutations that ran to completion.
    pub fn completed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SqlHandle for SlowHandle {
    async fn exec(&self, statement: &str) -> Result<(), RemoteError> {
        tokio::time::sleep(self.delay).await;
        self.executed.lock().unwrap().push(statement.to_string());
        Ok(())
    }

    async fn query(&self, _statement: &str) -> Result<Vec<Row>, RemoteError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }
}

//! Error types for the reconciliation engine.

/// Closed error taxonomy surfaced to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedIdentifier,
    InvalidAttribute,
    RemoteExecution,
    NotFound,
    Unsupported,
}

/// Provider errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Identifier could not be parsed.
    #[error("malformed identifier {input:?}: {reason}")]
    MalformedIdentifier { input: String, reason: String },

    /// Attribute value rejected by validation.
    #[error("invalid value for {attribute}: {reason}")]
    InvalidAttribute { attribute: String, reason: String },

    /// Statement failed on the remote. `statement` is already redacted.
    #[error("remote execution failed{}: {message} (statement: {statement})", .code.as_deref().map(|c| format!(" [{c}]")).unwrap_or_default())]
    RemoteExecution {
        statement: String,
        code: Option<String>,
        message: String,
    },

    /// Object expected to exist was not found.
    #[error("object not found: {object}")]
    NotFound { object: String },

    /// Operation cannot be expressed against the remote.
    #[error("{operation} is not supported: {reason}")]
    Unsupported { operation: String, reason: String },

    /// Context was cancelled before the next dispatch.
    #[error("operation cancelled before dispatch")]
    Cancelled,

    /// Persisted state could not be decoded or upgraded.
    #[error("state error: {message}")]
    State { message: String },
}

impl ProviderError {
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Position in the closed taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedIdentifier { .. } => ErrorKind::MalformedIdentifier,
            Self::InvalidAttribute { .. } | Self::State { .. } => ErrorKind::InvalidAttribute,
            Self::RemoteExecution { .. } | Self::Cancelled => ErrorKind::RemoteExecution,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
        }
    }

    /// Errors raised before any statement is dispatched. These never mutate state.
    pub fn is_plan_time(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MalformedIdentifier | ErrorKind::InvalidAttribute
        )
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::State {
            message: err.to_string(),
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

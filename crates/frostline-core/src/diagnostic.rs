//! User-facing diagnostics handed back to the host.

use serde::Serialize;

use crate::error::{ErrorKind, ProviderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A typed diagnostic with severity and a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Attribute the diagnostic is attached to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Map an error onto a diagnostic. NotFound is the only non-fatal kind.
    pub fn from_error(err: &ProviderError) -> Self {
        let diag = match err.kind() {
            ErrorKind::NotFound => Self::warning("object no longer exists on the remote"),
            ErrorKind::MalformedIdentifier => Self::error("malformed identifier"),
            ErrorKind::InvalidAttribute => Self::error("invalid attribute value"),
            ErrorKind::RemoteExecution => Self::error("remote execution failed"),
            ErrorKind::Unsupported => Self::error("unsupported operation"),
        };
        let diag = diag.with_detail(err.to_string());
        match err {
            ProviderError::InvalidAttribute { attribute, .. } => diag.with_attribute(attribute),
            _ => diag,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<&ProviderError> for Diagnostic {
    fn from(err: &ProviderError) -> Self {
        Self::from_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_attribute_carries_attribute() {
        let err = ProviderError::invalid("email", "must contain '@'");
        let diag = Diagnostic::from_error(&err);
        assert!(diag.is_error());
        assert_eq!(diag.attribute.as_deref(), Some("email"));
        assert!(diag.detail.unwrap().contains("must contain '@'"));
    }

    #[test]
    fn test_not_found_is_warning() {
        let err = ProviderError::NotFound {
            object: "\"DB\".\"S\".\"P\"".to_string(),
        };
        assert_eq!(Diagnostic::from_error(&err).severity, Severity::Warning);
    }

    #[test]
    fn test_unsupported_summary() {
        let err = ProviderError::unsupported("account deletion", "no self-service API");
        let diag = Diagnostic::from(&err);
        assert_eq!(diag.summary, "unsupported operation");
        assert_eq!(
            diag.detail.as_deref(),
            Some("account deletion is not supported: no self-service API")
        );
    }
}

//! Provider configuration.
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `FROSTLINE_DROP_IF_EXISTS` | Emit `IF EXISTS` in masking-policy drops (default: off) |
//! | `FROSTLINE_QUERY_TIMEOUT` | Timeout for read queries in seconds, `0` disables (default: 600) |
//! | `FROSTLINE_LOG_STATEMENTS` | Log redacted statement text at debug level (default: on) |

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Guard masking-policy drops with `IF EXISTS`.
    #[serde(default)]
    pub drop_if_exists: bool,

    /// Upper bound on one read query, in seconds. Mutations are never bounded: an
    /// abandoned DDL statement may still be applied by the remote.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,

    #[serde(default = "default_log_statements")]
    pub log_statements: bool,
}

fn default_query_timeout() -> u64 {
    600
}

fn default_log_statements() -> bool {
    true
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            drop_if_exists: false,
            query_timeout_secs: default_query_timeout(),
            log_statements: default_log_statements(),
        }
    }
}

impl ProviderConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            drop_if_exists: env_flag("FROSTLINE_DROP_IF_EXISTS").unwrap_or(false),
            query_timeout_secs: std::env::var("FROSTLINE_QUERY_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_query_timeout),
            log_statements: env_flag("FROSTLINE_LOG_STATEMENTS")
                .unwrap_or_else(default_log_statements),
        }
    }

    pub fn from_yaml_str(content: &str) -> ProviderResult<Self> {
        serde_yaml::from_str(content).map_err(|e| ProviderError::InvalidAttribute {
            attribute: "provider".to_string(),
            reason: format!("failed to parse provider config: {e}"),
        })
    }

    pub fn with_drop_if_exists(mut self, drop_if_exists: bool) -> Self {
        self.drop_if_exists = drop_if_exists;
        self
    }

    pub fn with_query_timeout_secs(mut self, secs: u64) -> Self {
        self.query_timeout_secs = secs;
        self
    }

    pub fn with_log_statements(mut self, log_statements: bool) -> Self {
        self.log_statements = log_statements;
        self
    }

    /// `None` when timeouts are disabled.
    pub fn query_timeout(&self) -> Option<Duration> {
        (self.query_timeout_secs > 0).then(|| Duration::from_secs(self.query_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 3] = [
        "FROSTLINE_DROP_IF_EXISTS",
        "FROSTLINE_QUERY_TIMEOUT",
        "FROSTLINE_LOG_STATEMENTS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        assert_eq!(ProviderConfig::from_env(), ProviderConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("FROSTLINE_DROP_IF_EXISTS", "TRUE");
        std::env::set_var("FROSTLINE_QUERY_TIMEOUT", "30");
        std::env::set_var("FROSTLINE_LOG_STATEMENTS", "0");
        let config = ProviderConfig::from_env();
        clear_env();

        assert!(config.drop_if_exists);
        assert_eq!(config.query_timeout(), Some(Duration::from_secs(30)));
        assert!(!config.log_statements);
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_unparseable_timeout() {
        clear_env();
        std::env::set_var("FROSTLINE_QUERY_TIMEOUT", "soon");
        let config = ProviderConfig::from_env();
        clear_env();
        assert_eq!(config.query_timeout_secs, 600);
    }

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::default();
        assert!(!config.drop_if_exists);
        assert_eq!(config.query_timeout(), Some(Duration::from_secs(600)));
        assert!(config.log_statements);
    }

    #[test]
    fn test_yaml_partial() {
        let config = ProviderConfig::from_yaml_str("drop_if_exists: true\nquery_timeout_secs: 0\n")
            .unwrap();
        assert!(config.drop_if_exists);
        assert_eq!(config.query_timeout(), None);
        assert!(config.log_statements);
    }

    #[test]
    fn test_yaml_invalid() {
        assert!(ProviderConfig::from_yaml_str("drop_if_exists: [").is_err());
    }

    #[test]
    fn test_builders() {
        let config = ProviderConfig::default()
            .with_drop_if_exists(true)
            .with_query_timeout_secs(5)
            .with_log_statements(false);
        assert!(config.drop_if_exists);
        assert_eq!(config.query_timeout(), Some(Duration::from_secs(5)));
        assert!(!config.log_statements);
    }
}

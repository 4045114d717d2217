//! Per-operation context: cancellation plus provider configuration.

use frostline_core::{ProviderConfig, ProviderError, ProviderResult};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: CancellationToken,
    config: ProviderConfig,
}

impl Context {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            cancel: CancellationToken::new(),
            config,
        }
    }

    /// Share an existing token, typically one owned by the host's shutdown path.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fails with [`ProviderError::Cancelled`] once the token fires.
    pub fn check(&self) -> ProviderResult<()> {
        if self.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        Ok(())
    }
}

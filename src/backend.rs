//! The interception substrate that serves compiled rules to real traffic.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::RuleSet;

#[derive(Debug, Error)]
#[error("interception backend rejected update: {message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Receives every newly compiled rule set.
///
/// Implementations must replace all previously installed rules with the given
/// set; the engine never sends incremental changes.
#[async_trait]
pub trait InterceptionBackend: Send + Sync + 'static {
    async fn replace_rules(&self, rules: &RuleSet) -> Result<(), BackendError>;
}

#[async_trait]
impl<B: InterceptionBackend + ?Sized> InterceptionBackend for Arc<B> {
    async fn replace_rules(&self, rules: &RuleSet) -> Result<(), BackendError> {
        (**self).replace_rules(rules).await
    }
}

/// A backend that accepts everything and installs nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBackend;

#[async_trait]
impl InterceptionBackend for NoopBackend {
    async fn replace_rules(&self, rules: &RuleSet) -> Result<(), BackendError> {
        tracing::trace!(count = rules.len(), "noop backend ignoring rule set");
        Ok(())
    }
}

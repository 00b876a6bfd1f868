use thiserror::Error;

use crate::ValidationError;
use crate::backend::BackendError;
use crate::config::ConfigError;
use crate::store::StoreError;
use crate::transfer::ImportError;

/// Unified error type returned by [`EngineHandle`](crate::EngineHandle) commands.
///
/// A failed command leaves the engine's rules, enabled flag and compiled set
/// exactly as they were.
#[derive(Debug, Error)]
pub enum AutoresponderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to export rules: {0}")]
    Export(#[source] serde_json::Error),

    #[error("rule index {index} out of range for {len} rules")]
    RuleIndex { index: usize, len: usize },

    #[error("engine task has shut down")]
    EngineClosed,
}

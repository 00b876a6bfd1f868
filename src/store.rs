//! Persistence of the rule list and the global enabled flag.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::transfer::decode_records;
use crate::{EngineConfig, Rule};

/// Everything the engine persists between runs.
///
/// Rule records are decoded one by one: a record that does not fit the
/// schema is dropped with a warning and the rest still load. Only a `rules`
/// value that is not a list makes the snapshot malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default, deserialize_with = "lenient_rules")]
    pub rules: Vec<Rule>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn lenient_rules<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Rule>, D::Error> {
    let items = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(decode_records(items))
}

fn enabled_by_default() -> bool {
    true
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            enabled: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored snapshot is malformed: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("cannot encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value storage owned by the host application.
#[async_trait]
pub trait RuleStore: Send + Sync + 'static {
    async fn load(&self) -> Result<PersistedState, StoreError>;

    async fn save(&self, state: &PersistedState) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: RuleStore + ?Sized> RuleStore for Arc<S> {
    async fn load(&self) -> Result<PersistedState, StoreError> {
        (**self).load().await
    }

    async fn save(&self, state: &PersistedState) -> Result<(), StoreError> {
        (**self).save(state).await
    }
}

/// In-process store, mainly for tests and embedding without persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<PersistedState>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// What was last saved.
    #[must_use]
    pub fn snapshot(&self) -> PersistedState {
        self.state.lock().clone()
    }
}

#[async_trait]
impl RuleStore for MemoryStore {
    async fn load(&self) -> Result<PersistedState, StoreError> {
        Ok(self.snapshot())
    }

    async fn save(&self, state: &PersistedState) -> Result<(), StoreError> {
        *self.state.lock() = state.clone();
        Ok(())
    }
}

/// Stores the snapshot as a JSON document on disk.
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A store at the configured `rules_file`, if one is set.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Option<Self> {
        config.rules_file.as_ref().map(Self::new)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl RuleStore for JsonFileStore {
    async fn load(&self) -> Result<PersistedState, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(StoreError::Malformed),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no rules file yet, starting empty");
                Ok(PersistedState::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, state: &PersistedState) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(state).map_err(StoreError::Encode)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let temp = self.temp_path();
        tokio::fs::write(&temp, bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

use super::Snapshot;
use super::command::{Command, Edit};
use crate::backend::InterceptionBackend;
use crate::compile::compile_with_cache;
use crate::matcher::MatcherCache;
use crate::store::{PersistedState, RuleStore};
use crate::{AutoresponderError, EventLog, Rule};

/// The single task that owns the rule list.
///
/// Commands are handled strictly one at a time, so at most one compilation
/// pass is ever in flight and every published snapshot comes from exactly one
/// rule list.
pub(crate) struct Actor<S, B> {
    pub(crate) store: S,
    pub(crate) backend: B,
    pub(crate) current: Arc<Snapshot>,
    pub(crate) cache: MatcherCache,
    pub(crate) log: Arc<Mutex<EventLog>>,
    pub(crate) publish: watch::Sender<Arc<Snapshot>>,
    pub(crate) commands: mpsc::Receiver<Command>,
}

impl<S: RuleStore, B: InterceptionBackend> Actor<S, B> {
    pub(crate) async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Edit { edit, reply } => {
                    let result = self.edit(edit).await;
                    // the caller may have gone away; the edit stands either way
                    let _ = reply.send(result);
                }
                Command::SetEnabled { enabled, reply } => {
                    let rules = self.current.rules.clone();
                    let result = self.transition(rules, enabled).await;
                    let _ = reply.send(result);
                }
            }
        }
        debug!("command queue closed, engine stopping");
    }

    async fn edit(&mut self, edit: Edit) -> Result<Vec<Rule>, AutoresponderError> {
        let rules = edit.apply(&self.current.rules)?;
        let enabled = self.current.enabled;
        self.transition(rules, enabled).await?;
        Ok(self.current.rules.clone())
    }

    /// Compile, persist and install a new state, then commit it.
    ///
    /// Nothing observable changes unless every step succeeds.
    async fn transition(&mut self, rules: Vec<Rule>, enabled: bool) -> Result<(), AutoresponderError> {
        let compilation = compile_with_cache(&rules, enabled, &self.cache);
        let next = PersistedState { rules, enabled };

        self.store.save(&next).await?;

        if let Err(err) = self.backend.replace_rules(&compilation.rule_set).await {
            error!(error = %err, "backend update failed, restoring previous state");
            self.restore().await;
            return Err(err.into());
        }

        self.cache = compilation.cache;
        self.log.lock().extend(compilation.diagnostics);

        info!(
            rules = next.rules.len(),
            compiled = compilation.rule_set.len(),
            enabled,
            "rule set replaced"
        );
        let snapshot = Arc::new(Snapshot {
            rules: next.rules,
            enabled,
            rule_set: Arc::new(compilation.rule_set),
        });
        self.current = Arc::clone(&snapshot);
        self.publish.send_replace(snapshot);
        Ok(())
    }

    async fn restore(&self) {
        let previous = PersistedState {
            rules: self.current.rules.clone(),
            enabled: self.current.enabled,
        };
        if let Err(err) = self.store.save(&previous).await {
            error!(error = %err, "could not restore previous snapshot in store");
        }
        if let Err(err) = self.backend.replace_rules(&self.current.rule_set).await {
            error!(error = %err, "could not reinstall previous rule set");
        }
    }
}

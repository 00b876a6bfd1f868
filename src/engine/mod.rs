//! The command-driven engine that owns the rule list.
//!
//! Mutations are queued to a single task and applied one at a time: the new
//! rule list is compiled, persisted through the [`RuleStore`] and installed in
//! the [`InterceptionBackend`] before it becomes visible. Reads go straight
//! to the last committed [`Snapshot`] and never wait on the queue.

mod actor;
mod command;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::info;

use self::actor::Actor;
use self::command::{Command, Edit, Reply};
use crate::backend::InterceptionBackend;
use crate::store::RuleStore;
use crate::{
    AutoresponderError, CompiledRule, EngineConfig, EventLog, LogEntry, MatcherCache, Request, Rule,
    RuleInput, RuleSet, compile_with_cache, transfer,
};

/// A committed engine state: the rule list, the global flag and the rule set
/// compiled from exactly that pair.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub rules: Vec<Rule>,
    pub enabled: bool,
    pub rule_set: Arc<RuleSet>,
}

/// Summary for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub enabled: bool,
    /// All stored rules.
    pub rule_count: usize,
    /// Stored rules with their own enabled flag set.
    pub active_count: usize,
    /// Rules in the installed rule set.
    pub compiled_count: usize,
}

/// Cloneable handle to a running engine.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
    snapshot: watch::Receiver<Arc<Snapshot>>,
    log: Arc<Mutex<EventLog>>,
}

impl EngineHandle {
    /// Load the persisted state, install its rule set and start the engine task.
    ///
    /// Must be called within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`AutoresponderError::Store`] if the snapshot cannot be loaded
    /// and [`AutoresponderError::Backend`] if the initial rule set is refused.
    pub async fn start<S, B>(
        config: &EngineConfig,
        store: S,
        backend: B,
    ) -> Result<Self, AutoresponderError>
    where
        S: RuleStore,
        B: InterceptionBackend,
    {
        let persisted = store.load().await?;
        let compilation =
            compile_with_cache(&persisted.rules, persisted.enabled, &MatcherCache::new());
        backend.replace_rules(&compilation.rule_set).await?;

        let mut log = EventLog::with_capacity(config.log_capacity);
        log.extend(compilation.diagnostics);
        let log = Arc::new(Mutex::new(log));

        info!(
            rules = persisted.rules.len(),
            compiled = compilation.rule_set.len(),
            enabled = persisted.enabled,
            "engine started"
        );
        let current = Arc::new(Snapshot {
            rules: persisted.rules,
            enabled: persisted.enabled,
            rule_set: Arc::new(compilation.rule_set),
        });
        let (publish, snapshot) = watch::channel(Arc::clone(&current));
        let (commands, receiver) = mpsc::channel(config.command_buffer.max(1));

        let actor = Actor {
            store,
            backend,
            current,
            cache: compilation.cache,
            log: Arc::clone(&log),
            publish,
            commands: receiver,
        };
        tokio::spawn(actor.run());

        Ok(Self {
            commands,
            snapshot,
            log,
        })
    }

    /// The most recently committed state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.borrow())
    }

    #[must_use]
    pub fn get_rules(&self) -> Vec<Rule> {
        self.snapshot().rules.clone()
    }

    #[must_use]
    pub fn rule_set(&self) -> Arc<RuleSet> {
        Arc::clone(&self.snapshot().rule_set)
    }

    #[must_use]
    pub fn status(&self) -> Status {
        let snapshot = self.snapshot();
        Status {
            enabled: snapshot.enabled,
            rule_count: snapshot.rules.len(),
            active_count: snapshot.rules.iter().filter(|r| r.enabled).count(),
            compiled_count: snapshot.rule_set.len(),
        }
    }

    /// Event log entries, newest first.
    #[must_use]
    pub fn logs(&self) -> Vec<LogEntry> {
        self.log.lock().list()
    }

    pub fn clear_logs(&self) {
        self.log.lock().clear();
    }

    /// Rules matching a search query, with their positions in the list.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<(usize, Rule)> {
        self.snapshot()
            .rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| query.is_empty() || rule.matches_query(query))
            .map(|(index, rule)| (index, rule.clone()))
            .collect()
    }

    /// The rule list as an exportable JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`AutoresponderError::Export`] if serialization fails.
    pub fn export_json(&self) -> Result<String, AutoresponderError> {
        transfer::export_rules(&self.snapshot().rules).map_err(AutoresponderError::Export)
    }

    /// Run a request against the installed rule set and log the interception.
    pub fn simulate(&self, request: &Request) -> Option<CompiledRule> {
        let rule_set = self.rule_set();
        let hit = rule_set.evaluate(request)?.clone();
        tracing::debug!(rule_id = hit.id(), url = %request.url, "request intercepted");
        self.log.lock().append(LogEntry::intercepted(
            hit.id(),
            &request.url,
            request.resource_type.as_str(),
        ));
        Some(hit)
    }

    /// Replace the whole rule list.
    ///
    /// # Errors
    ///
    /// Returns [`AutoresponderError`] if persisting or installing fails.
    pub async fn save_rules(&self, rules: Vec<Rule>) -> Result<(), AutoresponderError> {
        self.edit(Edit::Replace(rules)).await.map(drop)
    }

    /// Validate and append a rule. Returns the new list.
    ///
    /// # Errors
    ///
    /// Returns [`AutoresponderError::Validation`] for a rejected rule, or a
    /// store/backend error.
    pub async fn add_rule(&self, input: RuleInput) -> Result<Vec<Rule>, AutoresponderError> {
        self.edit(Edit::Add(input)).await
    }

    /// Validate and replace the rule at `index`. Returns the new list.
    ///
    /// # Errors
    ///
    /// As [`add_rule`](Self::add_rule), plus [`AutoresponderError::RuleIndex`].
    pub async fn update_rule(
        &self,
        index: usize,
        input: RuleInput,
    ) -> Result<Vec<Rule>, AutoresponderError> {
        self.edit(Edit::Update { index, input }).await
    }

    /// # Errors
    ///
    /// Returns [`AutoresponderError::RuleIndex`] or a store/backend error.
    pub async fn delete_rule(&self, index: usize) -> Result<Vec<Rule>, AutoresponderError> {
        self.edit(Edit::Delete(index)).await
    }

    /// # Errors
    ///
    /// Returns [`AutoresponderError::RuleIndex`] if any index is out of
    /// range, in which case nothing is deleted.
    pub async fn delete_rules(&self, indices: Vec<usize>) -> Result<Vec<Rule>, AutoresponderError> {
        self.edit(Edit::DeleteMany(indices)).await
    }

    /// Append a copy of the rule at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AutoresponderError::RuleIndex`] or a store/backend error.
    pub async fn duplicate_rule(&self, index: usize) -> Result<Vec<Rule>, AutoresponderError> {
        self.edit(Edit::Duplicate(index)).await
    }

    /// Set the per-rule enabled flag on several rules at once.
    ///
    /// # Errors
    ///
    /// Returns [`AutoresponderError::RuleIndex`] or a store/backend error.
    pub async fn set_rules_enabled(
        &self,
        indices: Vec<usize>,
        enabled: bool,
    ) -> Result<Vec<Rule>, AutoresponderError> {
        self.edit(Edit::SetEnabled { indices, enabled }).await
    }

    /// Append rules, silently dropping any without a pattern or content.
    ///
    /// # Errors
    ///
    /// Returns a store/backend error.
    pub async fn import_rules(&self, rules: Vec<Rule>) -> Result<Vec<Rule>, AutoresponderError> {
        self.edit(Edit::Import(rules)).await
    }

    /// Parse an exported JSON document and append its usable rules.
    ///
    /// # Errors
    ///
    /// Returns [`AutoresponderError::Import`] if the document is not a JSON
    /// array, or a store/backend error.
    pub async fn import_json(&self, json: &str) -> Result<Vec<Rule>, AutoresponderError> {
        let rules = transfer::parse_import(json)?;
        self.import_rules(rules).await
    }

    /// Global switch. While off, the installed rule set is empty.
    ///
    /// # Errors
    ///
    /// Returns a store/backend error; the previous flag stays in effect.
    pub async fn toggle_enabled(&self, enabled: bool) -> Result<(), AutoresponderError> {
        self.request(|reply| Command::SetEnabled { enabled, reply }).await
    }

    async fn edit(&self, edit: Edit) -> Result<Vec<Rule>, AutoresponderError> {
        self.request(|reply| Command::Edit { edit, reply }).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, AutoresponderError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| AutoresponderError::EngineClosed)?;
        response.await.map_err(|_| AutoresponderError::EngineClosed)?
    }
}

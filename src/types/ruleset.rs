use std::fmt;

use super::match_report::MatchReport;
use super::request::Request;
use super::rule::CompiledRule;

/// The output of one compilation pass: compiled rules in id order.
///
/// Immutable once built. A new pass replaces the whole set rather than
/// patching it, so the set is always derived from a single rule snapshot.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub(crate) rules: Vec<CompiledRule>,
}

impl RuleSet {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }

    /// Look up a compiled rule by its id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&CompiledRule> {
        // ids are 1..=N in storage order
        let idx = usize::try_from(id).ok()?.checked_sub(1)?;
        self.rules.get(idx)
    }

    /// Find the rule that answers this request, if any.
    ///
    /// The highest priority applicable rule wins; among equal priorities the
    /// lowest id wins.
    #[must_use]
    pub fn evaluate(&self, request: &Request) -> Option<&CompiledRule> {
        crate::evaluate::evaluate(&self.rules, request)
    }

    /// Evaluate and report every applicable rule alongside the winner.
    pub fn explain(&self, request: &Request) -> MatchReport {
        crate::evaluate::explain(&self.rules, request)
    }

    /// Compiled ids in order.
    #[must_use]
    pub fn ids(&self) -> Vec<u32> {
        self.rules.iter().map(CompiledRule::id).collect()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleSet({} rules)", self.rules.len())
    }
}

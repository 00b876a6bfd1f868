use std::fmt;

/// Diagnostic result of [`RuleSet::explain()`](super::ruleset::RuleSet::explain).
///
/// Lists every compiled rule that applied to the request, in id order, and
/// the one that won.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct MatchReport {
    winner: Option<u32>,
    candidates: Vec<u32>,
}

impl MatchReport {
    pub(crate) fn new(winner: Option<u32>, candidates: Vec<u32>) -> Self {
        Self { winner, candidates }
    }

    /// Id of the rule that would answer, same as [`RuleSet::evaluate()`](super::ruleset::RuleSet::evaluate).
    #[must_use]
    pub fn winner(&self) -> Option<u32> {
        self.winner
    }

    /// Ids of all applicable rules, in id order.
    #[must_use]
    pub fn candidates(&self) -> &[u32] {
        &self.candidates
    }

    /// Applicable rules that lost to the winner.
    pub fn shadowed(&self) -> impl Iterator<Item = u32> + '_ {
        self.candidates
            .iter()
            .copied()
            .filter(move |id| Some(*id) != self.winner)
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner {
            Some(id) => write!(f, "winner: rule {id}")?,
            None => write!(f, "winner: none")?,
        }
        let ids: Vec<String> = self.candidates.iter().map(u32::to_string).collect();
        write!(f, ", candidates: [{}]", ids.join(", "))
    }
}

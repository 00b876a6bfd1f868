use crate::{CompiledRule, MatchReport, Request};

pub(crate) fn evaluate<'a>(rules: &'a [CompiledRule], request: &Request) -> Option<&'a CompiledRule> {
    let mut best: Option<&CompiledRule> = None;
    // rules are in id order, so only a strictly higher priority displaces the current pick
    for rule in rules.iter().filter(|r| r.applies_to(request)) {
        if best.is_none_or(|b| rule.priority > b.priority) {
            best = Some(rule);
        }
    }
    best
}

pub(crate) fn explain(rules: &[CompiledRule], request: &Request) -> MatchReport {
    let candidates: Vec<u32> = rules
        .iter()
        .filter(|r| r.applies_to(request))
        .map(CompiledRule::id)
        .collect();
    let winner = evaluate(rules, request).map(CompiledRule::id);
    MatchReport::new(winner, candidates)
}

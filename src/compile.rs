use tracing::{debug, info, warn};

use crate::matcher::MatcherCache;
use crate::{CompileError, CompiledRule, LogEntry, ResourceSet, Rule, RuleSet, encode};

/// Result of a compilation pass.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub rule_set: RuleSet,
    /// One `Registered` entry per compiled rule and one `Error` entry per
    /// rule that failed, in rule order.
    pub diagnostics: Vec<LogEntry>,
    /// Matchers in use by `rule_set`, to seed the next pass.
    pub cache: MatcherCache,
    /// How many matchers had to be built rather than taken from the cache.
    pub fresh_matchers: usize,
}

/// Compile a rule list from scratch.
#[must_use]
pub fn compile(rules: &[Rule], globally_enabled: bool) -> Compilation {
    compile_with_cache(rules, globally_enabled, &MatcherCache::new())
}

/// Compile a rule list, reusing matchers from a previous pass.
///
/// Disabled and incomplete rules are skipped silently. A rule whose pattern
/// fails to compile is skipped with an `Error` diagnostic; the rest of the
/// list still compiles. Ids are assigned 1..=N over the surviving rules in
/// list order.
#[must_use]
pub fn compile_with_cache(
    rules: &[Rule],
    globally_enabled: bool,
    previous: &MatcherCache,
) -> Compilation {
    let mut compilation = Compilation {
        rule_set: RuleSet::empty(),
        diagnostics: Vec::new(),
        cache: MatcherCache::new(),
        fresh_matchers: 0,
    };

    if !globally_enabled {
        info!("interception disabled, compiled set is empty");
        return compilation;
    }

    let mut compiled = Vec::new();
    for rule in rules.iter().filter(|r| r.enabled && r.is_complete()) {
        let id = u32::try_from(compiled.len() + 1).unwrap_or(u32::MAX);
        match compile_rule(rule, id, previous, &mut compilation.cache) {
            Ok((compiled_rule, fresh)) => {
                if fresh {
                    compilation.fresh_matchers += 1;
                }
                debug!(rule_id = id, pattern = %rule.url_pattern, "rule registered");
                compilation.diagnostics.push(LogEntry::registered(
                    id,
                    &rule.url_pattern,
                    format!("{} -> {}", tag_name(rule), rule.response_type),
                ));
                compiled.push(compiled_rule);
            }
            Err(err) => {
                warn!(pattern = %rule.url_pattern, error = %err, "skipping rule");
                compilation
                    .diagnostics
                    .push(LogEntry::error(&rule.url_pattern, err.to_string()));
            }
        }
    }

    info!(count = compiled.len(), "rules activated");
    compilation.rule_set = RuleSet { rules: compiled };
    compilation
}

fn compile_rule(
    rule: &Rule,
    id: u32,
    previous: &MatcherCache,
    next: &mut MatcherCache,
) -> Result<(CompiledRule, bool), CompileError> {
    let (matcher, fresh) = previous
        .resolve(&rule.url_pattern, rule.match_type, next)
        .map_err(|source| CompileError::Pattern {
            pattern: rule.url_pattern.clone(),
            source,
        })?;

    Ok((
        CompiledRule {
            id,
            priority: rule.effective_priority(),
            matcher,
            resources: ResourceSet::from_filter(rule.resource_types.as_deref()),
            payload: encode(&rule.response_content, &rule.response_type),
        },
        fresh,
    ))
}

fn tag_name(rule: &Rule) -> &'static str {
    match rule.match_type {
        crate::TransportTag::Regex => "regex",
        crate::TransportTag::UrlFilter => "urlFilter",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LogAction, MatchType, ResourceType, RuleInput, TransportTag, validate};

    fn rule(pattern: &str) -> Rule {
        validate(RuleInput::new(pattern, "content")).unwrap()
    }

    fn stored(json: &str) -> Rule {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn ids_are_sequential_in_list_order() {
        let c = compile(&[rule("a"), rule("b"), rule("c")], true);
        assert_eq!(c.rule_set.ids(), vec![1, 2, 3]);
        let patterns: Vec<&str> = c.rule_set.iter().map(CompiledRule::pattern).collect();
        assert_eq!(patterns, vec!["*a*", "*b*", "*c*"]);
    }

    #[test]
    fn disabled_rules_are_skipped_without_diagnostics() {
        let mut off = rule("b");
        off.enabled = false;
        let c = compile(&[rule("a"), off, rule("c")], true);
        assert_eq!(c.rule_set.ids(), vec![1, 2]);
        assert_eq!(c.rule_set.get(2).map(CompiledRule::pattern), Some("*c*"));
        assert_eq!(c.diagnostics.len(), 2);
    }

    #[test]
    fn incomplete_rules_are_skipped() {
        let broken = stored(r#"{"urlPattern":"","responseContent":"x","enabled":true}"#);
        let empty = stored(r#"{"urlPattern":"*a*","responseContent":"","enabled":true}"#);
        let c = compile(&[broken, empty, rule("ok")], true);
        assert_eq!(c.rule_set.len(), 1);
        assert_eq!(c.rule_set.get(1).map(CompiledRule::pattern), Some("*ok*"));
    }

    #[test]
    fn bad_regex_is_isolated() {
        let bad = stored(
            r#"{"urlPattern":"^https://bad\\\\(","matchType":"regex","responseContent":"x","enabled":true}"#,
        );
        let c = compile(&[rule("a"), bad, rule("b")], true);
        assert_eq!(c.rule_set.ids(), vec![1, 2]);
        assert_eq!(c.rule_set.get(2).map(CompiledRule::pattern), Some("*b*"));

        let actions: Vec<LogAction> = c.diagnostics.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![LogAction::Registered, LogAction::Error, LogAction::Registered]
        );
        let error = &c.diagnostics[1];
        assert_eq!(error.target, r"^https://bad\\(");
        assert!(error.detail.as_deref().is_some_and(|d| d.contains("cannot compile")));
    }

    #[test]
    fn global_disable_yields_nothing() {
        let c = compile(&[rule("a"), rule("b"), rule("c")], false);
        assert!(c.rule_set.is_empty());
        assert!(c.diagnostics.is_empty());
        assert!(c.cache.is_empty());
    }

    #[test]
    fn registered_diagnostics_carry_ids() {
        let c = compile(&[rule("a"), rule("b")], true);
        let ids: Vec<Option<u32>> = c.diagnostics.iter().map(|e| e.rule_id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
        assert_eq!(c.diagnostics[0].detail.as_deref(), Some("urlFilter -> html"));
    }

    #[test]
    fn missing_resource_types_means_all() {
        let c = compile(&[rule("a")], true);
        assert!(c.rule_set.get(1).is_some_and(|r| r.resources().is_all()));

        let scripts =
            validate(RuleInput::new("a", "x").resource_types([ResourceType::Script])).unwrap();
        let c = compile(&[scripts], true);
        assert!(c.rule_set.get(1).is_some_and(|r| !r.resources().is_all()));
    }

    #[test]
    fn payload_is_encoded() {
        let json = validate(RuleInput::new("api", r#"{"a":1}"#).response_type("json")).unwrap();
        let c = compile(&[json], true);
        let payload = c.rule_set.get(1).map(|r| r.payload().clone()).unwrap();
        assert_eq!(payload.data_url(), "data:application/json;charset=utf-8;base64,eyJhIjoxfQ==");
    }

    #[test]
    fn cache_is_reused_across_passes() {
        let rules = vec![rule("a"), rule("b")];
        let first = compile(&rules, true);
        assert_eq!(first.fresh_matchers, 2);

        let second = compile_with_cache(&rules, true, &first.cache);
        assert_eq!(second.fresh_matchers, 0);

        let mut edited = rules.clone();
        edited[1] = rule("c");
        let third = compile_with_cache(&edited, true, &second.cache);
        assert_eq!(third.fresh_matchers, 1);
        assert!(!third.cache.contains("*b*", TransportTag::UrlFilter));
    }

    #[test]
    fn duplicate_patterns_share_a_matcher() {
        let c = compile(&[rule("a"), rule("a")], true);
        assert_eq!(c.rule_set.len(), 2);
        assert_eq!(c.fresh_matchers, 1);
        assert_eq!(c.cache.len(), 1);
    }

    #[test]
    fn regex_rule_compiles_with_regex_tag() {
        let r = validate(RuleInput::new(r"\.js$", "x").match_type(MatchType::Regex)).unwrap();
        let c = compile(&[r], true);
        assert_eq!(c.rule_set.get(1).map(CompiledRule::tag), Some(TransportTag::Regex));
    }
}

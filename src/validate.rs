use chrono::Utc;
use regex::Regex;

use crate::{MatchType, Rule, RuleInput, ValidationError};

/// Validate a submitted rule and derive its transport pattern.
///
/// The pattern is trimmed; content is taken verbatim. New rules start enabled.
///
/// # Errors
///
/// Returns [`ValidationError`] for an empty pattern, empty content, or a
/// `regex` pattern that does not compile.
pub fn validate(input: RuleInput) -> Result<Rule, ValidationError> {
    let pattern = input.pattern.trim();
    if pattern.is_empty() {
        return Err(ValidationError::EmptyPattern);
    }
    if input.content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    if input.match_type == MatchType::Regex {
        if let Err(err) = Regex::new(pattern) {
            return Err(ValidationError::InvalidRegex {
                pattern: pattern.to_owned(),
                reason: err.to_string(),
            });
        }
    }

    let now = Utc::now();
    Ok(Rule {
        url_pattern: transport_pattern(pattern, input.match_type),
        original_pattern: pattern.to_owned(),
        match_type: input.match_type.tag(),
        pattern_kind: Some(input.match_type),
        response_type: input.response_type,
        response_content: input.content,
        resource_types: if input.resource_types.is_empty() {
            None
        } else {
            Some(input.resource_types)
        },
        priority: input.priority.max(1),
        enabled: true,
        note: input.note.trim().to_owned(),
        created_at: now,
        updated_at: now,
    })
}

/// Wrap a user pattern in wildcards according to its match type.
///
/// Literal `*` in exact, prefix, suffix and contains patterns is not escaped;
/// the filter syntax has no escape for it.
#[must_use]
pub fn transport_pattern(pattern: &str, match_type: MatchType) -> String {
    match match_type {
        MatchType::Exact | MatchType::Wildcard | MatchType::Regex => pattern.to_owned(),
        MatchType::Prefix => format!("{pattern}*"),
        MatchType::Suffix => format!("*{pattern}"),
        MatchType::Contains => format!("*{pattern}*"),
    }
}

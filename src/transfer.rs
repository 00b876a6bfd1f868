//! Rule list import and export.
//!
//! The exchange format is a JSON array of rule records, the same shape the
//! store persists. Import is forgiving per element: records without a
//! non-empty `urlPattern` and `responseContent` are dropped, and so are
//! records that carry both but still do not decode as a rule (a negative
//! priority, an unknown resource type). Each drop is logged at `debug` with
//! its reason. Only a document that is not an array is an error.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::Rule;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid rule document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rule document must be a JSON array")]
    NotAnArray,
}

/// Serialize a rule list as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if serialization fails.
pub fn export_rules(rules: &[Rule]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(rules)
}

/// Parse an exported document, keeping only importable records.
///
/// # Errors
///
/// Returns [`ImportError`] if the text is not JSON or not an array.
pub fn parse_import(json: &str) -> Result<Vec<Rule>, ImportError> {
    let Value::Array(items) = serde_json::from_str(json)? else {
        return Err(ImportError::NotAnArray);
    };

    let total = items.len();
    let complete: Vec<Value> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if has_text(&item, "urlPattern") && has_text(&item, "responseContent") {
                Some(item)
            } else {
                debug!(index, "dropping import record without pattern or content");
                None
            }
        })
        .collect();
    let rules = decode_records(complete);
    debug!(total, kept = rules.len(), "parsed rule import");
    Ok(rules)
}

/// Decode rule records one at a time, skipping any that do not fit the schema.
pub(crate) fn decode_records(items: Vec<Value>) -> Vec<Rule> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(rule) => Some(rule),
            Err(err) => {
                warn!(index, error = %err, "dropping undecodable rule record");
                None
            }
        })
        .collect()
}

/// Drop records missing a pattern or content.
#[must_use]
pub fn retain_importable(rules: Vec<Rule>) -> Vec<Rule> {
    rules.into_iter().filter(Rule::is_complete).collect()
}

fn has_text(item: &Value, key: &str) -> bool {
    item.get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RuleInput, validate};

    #[test]
    fn drops_records_without_pattern_or_content() {
        let rules = parse_import(
            r#"[{"urlPattern":"a","responseContent":"b"},
                {"urlPattern":"","responseContent":"c"},
                {"urlPattern":"d"},
                {"responseContent":"e"}]"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].url_pattern, "a");
        assert_eq!(rules[0].response_content, "b");
    }

    #[test]
    fn drops_undecodable_records() {
        let rules = parse_import(
            r#"[{"urlPattern":"a","responseContent":"b","priority":"high"},
                {"urlPattern":"c","responseContent":"d","resourceTypes":["teapot"]},
                {"urlPattern":"e","responseContent":"f"}]"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].url_pattern, "e");
    }

    #[test]
    fn decode_records_keeps_the_rest() {
        let items: Vec<Value> = serde_json::from_str(
            r#"[{"urlPattern":"*a*","responseContent":"b","priority":-2},
                {"urlPattern":"*c*","responseContent":"d"},
                {"urlPattern":7}]"#,
        )
        .unwrap();
        let rules = decode_records(items);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].url_pattern, "*c*");
    }

    #[test]
    fn rejects_non_array() {
        assert!(matches!(
            parse_import(r#"{"urlPattern":"a"}"#),
            Err(ImportError::NotAnArray)
        ));
        assert!(matches!(parse_import("not json"), Err(ImportError::Json(_))));
    }

    #[test]
    fn export_then_import_preserves_rules() {
        let rules = vec![
            validate(RuleInput::new("api", "{}").response_type("json")).unwrap(),
            validate(RuleInput::new("app.js", "//").response_type("js").priority(4)).unwrap(),
        ];
        let json = export_rules(&rules).unwrap();
        let back = parse_import(&json).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[1].url_pattern, "*app.js*");
        assert_eq!(back[1].priority, 4);
        assert_eq!(back[0].created_at.timestamp_millis(), rules[0].created_at.timestamp_millis());
    }

    #[test]
    fn retain_importable_filters_typed_rules() {
        let mut bad = validate(RuleInput::new("a", "b")).unwrap();
        bad.response_content.clear();
        let good = validate(RuleInput::new("c", "d")).unwrap();
        let kept = retain_importable(vec![bad, good]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].original_pattern, "c");
    }
}

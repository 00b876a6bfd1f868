use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::payload::EncodedPayload;
use super::request::Request;
use super::resource::{ResourceSet, ResourceType};
use super::response::ResponseType;
use crate::matcher::Matcher;

/// How the user-entered pattern is interpreted when a rule is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Prefix,
    Suffix,
    #[default]
    Contains,
    Wildcard,
    Regex,
}

impl MatchType {
    #[must_use]
    pub fn tag(self) -> TransportTag {
        match self {
            MatchType::Regex => TransportTag::Regex,
            _ => TransportTag::UrlFilter,
        }
    }
}

/// The collapsed match type that is persisted and handed to the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransportTag {
    #[serde(rename = "regex")]
    Regex,
    #[default]
    #[serde(
        rename = "urlFilter",
        alias = "exact",
        alias = "prefix",
        alias = "suffix",
        alias = "contains",
        alias = "wildcard"
    )]
    UrlFilter,
}

/// A stored substitution rule.
///
/// Every field has a serde default so that a partially corrupted snapshot
/// still decodes; the compiler skips records that are not usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    pub url_pattern: String,
    #[serde(default)]
    pub original_pattern: String,
    #[serde(default)]
    pub match_type: TransportTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_kind: Option<MatchType>,
    #[serde(default)]
    pub response_type: ResponseType,
    #[serde(default)]
    pub response_content: String,
    #[serde(default)]
    pub resource_types: Option<Vec<ResourceType>>,
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub note: String,
    #[serde(default = "Utc::now", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

fn default_priority() -> u32 {
    1
}

impl Rule {
    /// Priority used for matching. Zero is treated as the default of 1.
    #[must_use]
    pub fn effective_priority(&self) -> u32 {
        self.priority.max(1)
    }

    /// Whether the record carries the two fields every usable rule needs.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.url_pattern.is_empty() && !self.response_content.is_empty()
    }

    /// Rebuild the edit form for this rule.
    ///
    /// Rules saved before `pattern_kind` was recorded come back as `contains`
    /// (or `regex`), with the stored transport pattern as the user pattern.
    #[must_use]
    pub fn to_input(&self) -> RuleInput {
        let (pattern, match_type) = match self.pattern_kind {
            Some(kind) if !self.original_pattern.is_empty() => (self.original_pattern.clone(), kind),
            _ => {
                let kind = match self.match_type {
                    TransportTag::Regex => MatchType::Regex,
                    TransportTag::UrlFilter => MatchType::Contains,
                };
                let pattern = if self.original_pattern.is_empty() {
                    self.url_pattern.clone()
                } else {
                    self.original_pattern.clone()
                };
                (pattern, kind)
            }
        };

        RuleInput {
            pattern,
            match_type,
            response_type: self.response_type.clone(),
            content: self.response_content.clone(),
            resource_types: self.resource_types.clone().unwrap_or_default(),
            priority: self.effective_priority(),
            note: self.note.clone(),
        }
    }

    /// Validate an edit of this rule. Creation time and enabled state carry over.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the edited input is rejected.
    pub fn revise(&self, input: RuleInput) -> Result<Rule, ValidationError> {
        let mut revised = crate::validate::validate(input)?;
        revised.created_at = self.created_at;
        revised.enabled = self.enabled;
        Ok(revised)
    }

    /// Case-insensitive search over pattern, original pattern, note and response type.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        [
            self.url_pattern.as_str(),
            self.original_pattern.as_str(),
            self.note.as_str(),
            self.response_type.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&q))
    }
}

/// A rule as submitted by a user, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInput {
    pub pattern: String,
    pub match_type: MatchType,
    pub response_type: ResponseType,
    pub content: String,
    pub resource_types: Vec<ResourceType>,
    pub priority: u32,
    pub note: String,
}

impl RuleInput {
    /// A `contains` rule answering with HTML at priority 1.
    #[must_use]
    pub fn new(pattern: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            match_type: MatchType::default(),
            response_type: ResponseType::default(),
            content: content.into(),
            resource_types: Vec::new(),
            priority: 1,
            note: String::new(),
        }
    }

    #[must_use]
    pub fn match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = match_type;
        self
    }

    #[must_use]
    pub fn response_type(mut self, response_type: impl Into<ResponseType>) -> Self {
        self.response_type = response_type.into();
        self
    }

    #[must_use]
    pub fn resource_types(mut self, types: impl IntoIterator<Item = ResourceType>) -> Self {
        self.resource_types = types.into_iter().collect();
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// A rule ready for matching: compiled matcher, resource filter and encoded payload.
///
/// Produced by a compilation pass and never modified afterwards. The `id` is
/// the rule's 1-based position among the rules that survived the pass.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub(crate) id: u32,
    pub(crate) priority: u32,
    pub(crate) matcher: Matcher,
    pub(crate) resources: ResourceSet,
    pub(crate) payload: EncodedPayload,
}

impl CompiledRule {
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub fn priority(&self) -> u32 {
        self.priority
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }

    #[must_use]
    pub fn tag(&self) -> TransportTag {
        self.matcher.tag()
    }

    #[must_use]
    pub fn resources(&self) -> ResourceSet {
        self.resources
    }

    #[must_use]
    pub fn payload(&self) -> &EncodedPayload {
        &self.payload
    }

    /// Whether this rule applies to the request (url and resource kind).
    #[must_use]
    pub fn applies_to(&self, request: &Request) -> bool {
        self.resources.contains(request.resource_type) && self.matcher.test(&request.url)
    }
}

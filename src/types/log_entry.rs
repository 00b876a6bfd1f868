use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogAction {
    #[serde(rename = "RULE_REGISTERED")]
    Registered,
    #[serde(rename = "REQUEST_INTERCEPTED")]
    Intercepted,
    #[serde(rename = "RULE_ERROR")]
    Error,
}

/// One record in the [`EventLog`](crate::EventLog).
///
/// `target` is the rule pattern for registration and error events and the
/// request URL for interceptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub action: LogAction,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn registered(rule_id: u32, pattern: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            action: LogAction::Registered,
            target: pattern.into(),
            rule_id: Some(rule_id),
            detail: Some(detail.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn intercepted(rule_id: u32, url: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            action: LogAction::Intercepted,
            target: url.into(),
            rule_id: Some(rule_id),
            detail: Some(detail.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn error(pattern: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            action: LogAction::Error,
            target: pattern.into(),
            rule_id: None,
            detail: Some(detail.into()),
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            LogAction::Registered => "registered",
            LogAction::Intercepted => "intercepted",
            LogAction::Error => "error",
        };
        write!(f, "[{}] {action} {}", self.timestamp.to_rfc3339(), self.target)?;
        if let Some(id) = self.rule_id {
            write!(f, " (rule {id})")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

mod error;
mod log_entry;
mod match_report;
mod payload;
mod request;
mod resource;
mod response;
mod rule;
mod ruleset;

pub use error::{CompileError, ValidationError};
pub use log_entry::{LogAction, LogEntry};
pub use match_report::MatchReport;
pub use payload::EncodedPayload;
pub use request::Request;
pub use resource::{ResourceSet, ResourceType};
pub use response::ResponseType;
pub use rule::{CompiledRule, MatchType, Rule, RuleInput, TransportTag};
pub use ruleset::RuleSet;

mod backend;
mod compile;
mod config;
mod encode;
mod engine;
mod error;
mod evaluate;
mod event_log;
mod matcher;
mod store;
mod templates;
mod transfer;
mod types;
mod validate;

pub use backend::{BackendError, InterceptionBackend, NoopBackend};
pub use compile::{Compilation, compile, compile_with_cache};
pub use config::{ConfigError, EngineConfig};
pub use encode::{encode, is_text_mime, mime_type};
pub use engine::{EngineHandle, Snapshot, Status};
pub use error::AutoresponderError;
pub use event_log::{DEFAULT_LOG_CAPACITY, EventLog};
pub use matcher::{Matcher, MatcherCache};
pub use store::{JsonFileStore, MemoryStore, PersistedState, RuleStore, StoreError};
pub use templates::Template;
pub use transfer::{ImportError, export_rules, parse_import, retain_importable};
pub use types::{
    CompileError, CompiledRule, EncodedPayload, LogAction, LogEntry, MatchReport, MatchType,
    Request, ResourceSet, ResourceType, ResponseType, Rule, RuleInput, RuleSet, TransportTag,
    ValidationError,
};
pub use validate::{transport_pattern, validate};

use thiserror::Error;

/// Rejection of a rule at save time. Never reaches the compiler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("url pattern must not be empty")]
    EmptyPattern,

    #[error("response content must not be empty")]
    EmptyContent,

    #[error("invalid regular expression '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },
}

/// Failure to compile a single stored rule.
///
/// Recovered inside the compiler: the rule is skipped and the error is
/// recorded in the event log.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("cannot compile pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_message() {
        assert_eq!(
            ValidationError::EmptyPattern.to_string(),
            "url pattern must not be empty"
        );
    }

    #[test]
    fn empty_content_message() {
        assert_eq!(
            ValidationError::EmptyContent.to_string(),
            "response content must not be empty"
        );
    }

    #[test]
    fn invalid_regex_message() {
        let err = ValidationError::InvalidRegex {
            pattern: "a(".into(),
            reason: "unclosed group".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid regular expression 'a(': unclosed group"
        );
    }

    #[test]
    fn compile_pattern_message() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = CompileError::Pattern {
            pattern: "(".into(),
            source,
        };
        assert!(err.to_string().starts_with("cannot compile pattern '(':"));
    }
}

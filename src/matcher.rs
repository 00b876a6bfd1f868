use std::collections::HashMap;

use regex::Regex;

use crate::TransportTag;

/// A compiled URL predicate.
///
/// `urlFilter` patterns treat `*` as "any run of characters, possibly empty"
/// and everything else literally; they must cover the whole URL. `regex`
/// patterns match anywhere in the URL unless they carry their own anchors.
/// Both are case-sensitive.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: String,
    tag: TransportTag,
    regex: Regex,
}

impl Matcher {
    /// # Errors
    ///
    /// Returns [`regex::Error`] if a `regex` pattern is invalid or either kind
    /// of pattern exceeds the regex engine's size limits.
    pub fn compile(pattern: &str, tag: TransportTag) -> Result<Self, regex::Error> {
        let regex = match tag {
            TransportTag::Regex => Regex::new(pattern)?,
            TransportTag::UrlFilter => Regex::new(&wildcard_to_regex(pattern))?,
        };
        Ok(Self {
            pattern: pattern.to_owned(),
            tag,
            regex,
        })
    }

    #[must_use]
    pub fn test(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn tag(&self) -> TransportTag {
        self.tag
    }
}

fn wildcard_to_regex(pattern: &str) -> String {
    let body: Vec<String> = pattern.split('*').map(regex::escape).collect();
    format!("(?s)^{}$", body.join(".*"))
}

/// Matchers from the previous compilation pass, keyed by `(tag, pattern)`.
///
/// A pass looks each rule up here before compiling and builds a fresh cache
/// holding only the patterns still in use, so an unchanged rule is never
/// recompiled and deleted rules do not linger.
#[derive(Debug, Clone, Default)]
pub struct MatcherCache {
    entries: HashMap<(TransportTag, String), Matcher>,
}

impl MatcherCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, pattern: &str, tag: TransportTag) -> bool {
        self.entries.contains_key(&(tag, pattern.to_owned()))
    }

    /// Fetch or build the matcher for `pattern`, recording it in `next`.
    ///
    /// Returns the matcher and whether it had to be compiled.
    pub(crate) fn resolve(
        &self,
        pattern: &str,
        tag: TransportTag,
        next: &mut MatcherCache,
    ) -> Result<(Matcher, bool), regex::Error> {
        let key = (tag, pattern.to_owned());
        if let Some(existing) = next.entries.get(&key) {
            return Ok((existing.clone(), false));
        }
        if let Some(existing) = self.entries.get(&key) {
            next.entries.insert(key, existing.clone());
            return Ok((existing.clone(), false));
        }
        let matcher = Matcher::compile(pattern, tag)?;
        next.entries.insert(key, matcher.clone());
        Ok((matcher, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(pattern: &str) -> Matcher {
        Matcher::compile(pattern, TransportTag::UrlFilter).unwrap()
    }

    #[test]
    fn contains_wildcard() {
        let m = filter("*api/users*");
        assert!(m.test("https://x.com/api/users/1"));
        assert!(m.test("api/users"));
        assert!(!m.test("https://x.com/other"));
    }

    #[test]
    fn exact_filter_matches_whole_url_only() {
        let m = filter("https://x.com/a.js");
        assert!(m.test("https://x.com/a.js"));
        assert!(!m.test("https://x.com/a.js?v=2"));
        assert!(!m.test("http://https://x.com/a.js"));
    }

    #[test]
    fn prefix_and_suffix() {
        let prefix = filter("https://cdn.x.com/*");
        assert!(prefix.test("https://cdn.x.com/lib.js"));
        assert!(prefix.test("https://cdn.x.com/"));
        assert!(!prefix.test("https://x.com/lib.js"));

        let suffix = filter("*.css");
        assert!(suffix.test("https://x.com/site.css"));
        assert!(!suffix.test("https://x.com/site.css.map"));
    }

    #[test]
    fn filter_metacharacters_are_literal() {
        let m = filter("*a.b?c=(1)*");
        assert!(m.test("https://x/a.b?c=(1)"));
        assert!(!m.test("https://x/aXb?c=(1)"));
        assert!(!m.test("https://x/a.bc=1"));
    }

    #[test]
    fn filter_is_case_sensitive() {
        let m = filter("*API*");
        assert!(!m.test("https://x.com/api"));
    }

    #[test]
    fn star_matches_empty_and_newlines() {
        let m = filter("a*b");
        assert!(m.test("ab"));
        assert!(m.test("a\nb"));
    }

    #[test]
    fn regex_is_unanchored() {
        let m = Matcher::compile(r"users/\d+", TransportTag::Regex).unwrap();
        assert!(m.test("https://x.com/api/users/42?x=1"));
        assert!(!m.test("https://x.com/api/users/me"));
    }

    #[test]
    fn regex_respects_user_anchors() {
        let m = Matcher::compile(r"^https://x\.com/$", TransportTag::Regex).unwrap();
        assert!(m.test("https://x.com/"));
        assert!(!m.test("https://x.com/a"));
    }

    #[test]
    fn invalid_regex_fails_fast() {
        assert!(Matcher::compile(r"^https://bad\\(", TransportTag::Regex).is_err());
        // the same text is a perfectly good filter
        assert!(Matcher::compile(r"^https://bad\\(", TransportTag::UrlFilter).is_ok());
    }

    #[test]
    fn cache_reuses_and_prunes() {
        let mut first = MatcherCache::new();
        let empty = MatcherCache::new();
        let (_, fresh) = empty.resolve("*a*", TransportTag::UrlFilter, &mut first).unwrap();
        assert!(fresh);
        let (_, fresh) = empty.resolve("*b*", TransportTag::UrlFilter, &mut first).unwrap();
        assert!(fresh);
        assert_eq!(first.len(), 2);

        let mut second = MatcherCache::new();
        let (_, fresh) = first.resolve("*a*", TransportTag::UrlFilter, &mut second).unwrap();
        assert!(!fresh);
        assert!(second.contains("*a*", TransportTag::UrlFilter));
        assert!(!second.contains("*b*", TransportTag::UrlFilter));
    }

    #[test]
    fn cache_keys_on_tag() {
        let mut next = MatcherCache::new();
        let prev = MatcherCache::new();
        prev.resolve("a.b", TransportTag::UrlFilter, &mut next).unwrap();
        let (_, fresh) = next.clone().resolve("a.b", TransportTag::Regex, &mut next).unwrap();
        assert!(fresh);
        assert_eq!(next.len(), 2);
    }
}

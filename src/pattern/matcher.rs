//! Regex-backed preview of compiled conditions

use super::{Condition, MatchField};
use crate::result::{ConditionMatch, PatternError};
use regex::Regex;

/// Tests sample request fields against a compiled [`Condition`].
///
/// Fastly evaluates `~` as an unanchored PCRE search; the `regex` crate
/// behaves the same way for the subset of syntax the compiler emits.
#[derive(Debug, Clone)]
pub struct ConditionMatcher {
    field: MatchField,
    regex: Regex,
}

impl ConditionMatcher {
    /// Build a matcher for a condition.
    pub fn new(condition: &Condition) -> Result<Self, PatternError> {
        Ok(Self {
            field: condition.field,
            regex: Regex::new(&condition.regex)?,
        })
    }

    /// Build a matcher from a condition statement such as
    /// `req.url ~ "example\.com/.*"`.
    pub fn from_statement(statement: &str) -> Result<Self, PatternError> {
        Self::new(&statement.parse()?)
    }

    /// Field the condition tests.
    pub fn field(&self) -> MatchField {
        self.field
    }

    /// Check whether the condition holds for `subject`.
    pub fn is_match(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }

    /// Find the first match in `subject`.
    pub fn find(&self, subject: &str) -> Option<ConditionMatch> {
        let captures = self.regex.captures(subject)?;
        let full_match = captures.get(0)?;

        let capture_strings = captures
            .iter()
            .map(|cap| cap.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect();

        Some(ConditionMatch {
            matched: full_match.as_str().to_string(),
            start: full_match.start(),
            end: full_match.end(),
            captures: capture_strings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_condition_matches_host() {
        let matcher = ConditionMatcher::new(&Condition::compile("*.example.com")).unwrap();
        assert_eq!(matcher.field(), MatchField::Host);
        assert!(matcher.is_match("www.example.com"));
        assert!(!matcher.is_match("www.exampleXcom"));
    }

    #[test]
    fn test_url_condition_find() {
        let matcher = ConditionMatcher::from_statement(r#"req.url ~ "/assets/.*""#).unwrap();
        let result = matcher.find("/static/assets/app.js").unwrap();

        assert_eq!(result.matched, "/assets/app.js");
        assert_eq!(result.start, 7);
        assert_eq!(result.end, 21);
        assert_eq!(result.captures, vec!["/assets/app.js".to_string()]);
    }

    #[test]
    fn test_no_match() {
        let matcher = ConditionMatcher::new(&Condition::compile("*example.com/api/*")).unwrap();
        assert!(matcher.find("example.com/static/x").is_none());
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let result = ConditionMatcher::new(&Condition::compile("*example.com/(*"));
        assert!(matches!(result, Err(PatternError::InvalidRegex(_))));
    }
}

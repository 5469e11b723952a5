//! Result types for condition previews

mod error;

pub use error::{PatternError, TranslateError};

/// Result of testing a sample request against a compiled condition.
///
/// # Examples
///
/// ```
/// use pagerule2fastly::{Condition, ConditionMatcher};
///
/// let condition = Condition::compile("*example.com/assets/*");
/// let matcher = ConditionMatcher::new(&condition).unwrap();
///
/// let found = matcher.find("https://example.com/assets/app.js").unwrap();
/// assert_eq!(found.matched, "example.com/assets/app.js");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionMatch {
    /// The matched text.
    pub matched: String,

    /// Start position of the match in the subject (byte offset).
    pub start: usize,

    /// End position of the match in the subject (byte offset).
    pub end: usize,

    /// Captured groups, index 0 being the full match.
    pub captures: Vec<String>,
}

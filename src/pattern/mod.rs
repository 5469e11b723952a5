//! Cloudflare wildcard pattern to Fastly condition compilation

mod matcher;

pub use matcher::ConditionMatcher;

use crate::result::PatternError;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Request field a condition tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchField {
    /// `req.http.host`, selected by a leading `*.`.
    Host,
    /// `req.url`, used for everything else.
    Url,
}

impl MatchField {
    /// VCL variable name.
    pub fn as_vcl(&self) -> &'static str {
        match self {
            MatchField::Host => "req.http.host",
            MatchField::Url => "req.url",
        }
    }
}

impl fmt::Display for MatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_vcl())
    }
}

/// A Fastly request condition of the form `<field> ~ "<regex>"`.
///
/// This is a best-effort string transform, not a regex compiler. Only `.`
/// and `*` are treated specially; any other regex metacharacter in the
/// pattern lands in the condition unchanged.
///
/// # Examples
///
/// ```
/// use pagerule2fastly::{Condition, MatchField};
///
/// let host = Condition::compile("*.example.com/*");
/// assert_eq!(host.field, MatchField::Host);
/// assert_eq!(host.to_string(), r#"req.http.host ~ "example\.com/.*""#);
///
/// let path = Condition::compile("*example.com/assets/*");
/// assert_eq!(path.to_string(), r#"req.url ~ "example\.com/assets/.*""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    /// Field the regex is tested against.
    pub field: MatchField,
    /// Regex body, without surrounding quotes.
    pub regex: String,
}

impl Condition {
    /// Compile a Cloudflare-style wildcard pattern. Total over all input.
    pub fn compile(pattern: &str) -> Self {
        // The leading wildcard is consumed by the opener: Fastly's `~` is an
        // unanchored search.
        let (field, body) = if let Some(rest) = pattern.strip_prefix("*.") {
            (MatchField::Host, rest)
        } else if let Some(rest) = pattern.strip_prefix('*') {
            (MatchField::Url, rest)
        } else {
            (MatchField::Url, pattern)
        };

        let regex = body
            .replace('.', "\\.")
            .replace('*', ".*")
            .replace("./*", ".*");

        debug!(pattern, field = %field, regex = %regex, "compiled condition");

        Self { field, regex }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ \"{}\"", self.field, self.regex)
    }
}

impl FromStr for Condition {
    type Err = PatternError;

    /// Parse a statement previously produced by [`compile_condition`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PatternError::MalformedCondition(s.to_string());

        let (field, rest) = s.split_once(" ~ ").ok_or_else(malformed)?;
        let field = match field.trim() {
            "req.http.host" => MatchField::Host,
            "req.url" => MatchField::Url,
            _ => return Err(malformed()),
        };
        let regex = rest
            .trim()
            .strip_prefix('"')
            .and_then(|r| r.strip_suffix('"'))
            .ok_or_else(malformed)?;

        Ok(Self {
            field,
            regex: regex.to_string(),
        })
    }
}

/// Convert a Cloudflare URL pattern into a Fastly condition statement.
///
/// # Examples
///
/// ```
/// use pagerule2fastly::compile_condition;
///
/// assert_eq!(compile_condition(""), r#"req.url ~ """#);
/// assert_eq!(
///     compile_condition("https://www.example.com/api/v1/*"),
///     r#"req.url ~ "https://www\.example\.com/api/v1/.*""#
/// );
/// ```
pub fn compile_condition(pattern: &str) -> String {
    Condition::compile(pattern).to_string()
}

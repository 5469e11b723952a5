//! Page Rule input model

mod action;

pub use action::{ActionType, RedirectStatus, SecurityHeader, UnknownAction};

use serde::{Deserialize, Deserializer, Serialize};

/// TTL used when `cache_ttl` does not start with an integer.
pub const DEFAULT_CACHE_TTL_SECS: i64 = 3600;

/// A Cloudflare Page Rule as entered by the user.
///
/// Only the fields belonging to the selected [`ActionType`] are read when
/// generating output. The others are kept untouched, so switching the action
/// back and forth never loses what was typed.
///
/// Every parameter is kept as text. Malformed values are not rejected here;
/// they flow into the generated configuration as-is.
///
/// # Examples
///
/// ```
/// use pagerule2fastly::{ActionType, Rule};
///
/// let rule = Rule {
///     url_pattern: "*example.com/assets/*".to_string(),
///     action_type: Some(ActionType::Cache),
///     cache_ttl: "120".to_string(),
///     ..Rule::default()
/// };
/// assert_eq!(rule.resolved_ttl(), "120s");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    /// Cloudflare-style wildcard pattern, e.g. `*example.com/assets/*`.
    pub url_pattern: String,

    /// Selected action. `None` when absent or unrecognized.
    #[serde(deserialize_with = "lenient_action")]
    pub action_type: Option<ActionType>,

    /// Edge cache TTL in seconds (cache action).
    pub cache_ttl: String,

    /// Redirect destination (redirect action).
    pub redirect_url: String,

    /// `301` or `302` (redirect action).
    pub redirect_type: String,

    /// `hsts` or `cors` (security action).
    pub security_header: String,

    /// Path the captured wildcard is appended to (rewrite action).
    pub rewrite_target: String,

    /// Request header that receives the captured wildcard (rewrite action).
    pub capture_header: String,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            url_pattern: "https://www.example.com/api/v1/*".to_string(),
            action_type: Some(ActionType::Rewrite),
            cache_ttl: "86400".to_string(),
            redirect_url: "https://newsite.com/".to_string(),
            redirect_type: "301".to_string(),
            security_header: "hsts".to_string(),
            rewrite_target: "/v2/legacy-api/".to_string(),
            capture_header: "X-Captured-Path".to_string(),
        }
    }
}

impl Rule {
    /// Resolve `cache_ttl` into a Fastly duration such as `120s`.
    ///
    /// Reads the leading decimal integer the way a browser's `parseInt` does,
    /// so `"120abc"` gives `120s`. The parse is decimal-only: a `0x` prefix
    /// reads as `0`. Anything without a leading integer, or too large for an
    /// `i64`, falls back to [`DEFAULT_CACHE_TTL_SECS`].
    pub fn resolved_ttl(&self) -> String {
        let secs = parse_leading_int(&self.cache_ttl).unwrap_or(DEFAULT_CACHE_TTL_SECS);
        format!("{}s", secs)
    }

    /// Status code and reason phrase for the redirect action.
    pub fn redirect_status(&self) -> RedirectStatus<'_> {
        RedirectStatus::from_code(&self.redirect_type)
    }

    /// Header name/value pair for the security action.
    pub fn security(&self) -> SecurityHeader {
        SecurityHeader::from_key(&self.security_header)
    }
}

/// Parse an optionally signed run of decimal digits after leading whitespace.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let value: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -value } else { value })
}

fn lenient_action<'de, D>(deserializer: D) -> Result<Option<ActionType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

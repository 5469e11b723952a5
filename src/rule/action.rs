//! Action selection and per-action parameter mapping

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four Page Rule actions that have a Fastly translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// Caching/TTL override.
    Cache,
    /// Forwarding URL.
    Redirect,
    /// HSTS or CORS response header.
    Security,
    /// Path rewrite with wildcard capture.
    Rewrite,
}

impl ActionType {
    /// All actions, in form order.
    pub const ALL: [ActionType; 4] = [
        ActionType::Cache,
        ActionType::Redirect,
        ActionType::Security,
        ActionType::Rewrite,
    ];

    /// The form value for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Cache => "cache",
            ActionType::Redirect => "redirect",
            ActionType::Security => "security",
            ActionType::Rewrite => "rewrite",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown action name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action type: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for ActionType {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cache" => Ok(ActionType::Cache),
            "redirect" => Ok(ActionType::Redirect),
            "security" => Ok(ActionType::Security),
            "rewrite" => Ok(ActionType::Rewrite),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Status line of a redirect response.
///
/// The code is whatever the rule carries; only `301` is recognized as a
/// permanent redirect and every other value is treated as `Found`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectStatus<'a> {
    /// Status code, emitted verbatim.
    pub code: &'a str,
    /// Canonical reason phrase.
    pub phrase: &'static str,
}

impl<'a> RedirectStatus<'a> {
    /// Map a redirect type to its status line.
    pub fn from_code(code: &'a str) -> Self {
        let phrase = if code == "301" {
            "Moved Permanently"
        } else {
            "Found"
        };
        Self { code, phrase }
    }
}

/// Response header emitted by the security action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityHeader {
    /// `Strict-Transport-Security`.
    Hsts,
    /// `Access-Control-Allow-Origin`.
    Cors,
}

impl SecurityHeader {
    /// Map a form key to a header. Anything other than `hsts` is CORS.
    pub fn from_key(key: &str) -> Self {
        if key == "hsts" {
            SecurityHeader::Hsts
        } else {
            SecurityHeader::Cors
        }
    }

    /// Header name.
    pub fn name(&self) -> &'static str {
        match self {
            SecurityHeader::Hsts => "Strict-Transport-Security",
            SecurityHeader::Cors => "Access-Control-Allow-Origin",
        }
    }

    /// Header value.
    pub fn value(&self) -> &'static str {
        match self {
            SecurityHeader::Hsts => "max-age=31536000; includeSubDomains; preload",
            SecurityHeader::Cors => "*",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_round_trips_through_str() {
        for action in ActionType::ALL {
            assert_eq!(action.as_str().parse::<ActionType>().unwrap(), action);
        }
    }

    #[test]
    fn test_action_parse_is_case_sensitive() {
        assert!("Cache".parse::<ActionType>().is_err());
        assert_eq!(
            "purge".parse::<ActionType>().unwrap_err().to_string(),
            "Unknown action type: purge"
        );
    }

    #[test]
    fn test_redirect_status() {
        assert_eq!(RedirectStatus::from_code("301").phrase, "Moved Permanently");
        assert_eq!(RedirectStatus::from_code("302").phrase, "Found");
        let odd = RedirectStatus::from_code("307");
        assert_eq!(odd.code, "307");
        assert_eq!(odd.phrase, "Found");
    }

    #[test]
    fn test_security_header_mapping() {
        let hsts = SecurityHeader::from_key("hsts");
        assert_eq!(hsts.name(), "Strict-Transport-Security");
        assert!(hsts.value().contains("max-age=31536000"));

        let cors = SecurityHeader::from_key("cors");
        assert_eq!(cors.name(), "Access-Control-Allow-Origin");
        assert_eq!(cors.value(), "*");
    }
}

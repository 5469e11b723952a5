//! Path rewrite with wildcard capture.
//!
//! The capture and the rewrite cannot be expressed with CLI objects, so the
//! CLI block only creates the condition and the VCL snippet does the work.

use super::{create_condition, TranslationResult};
use crate::rule::Rule;
use tracing::debug;

/// Index of the first path segment in a `scheme://host/seg/...` split.
const FIRST_PATH_SEGMENT: usize = 3;

/// Capture regex derived from a rule's URL pattern.
///
/// Segments are scanned starting at the first path segment of a
/// `scheme://host/...` pattern. Literal segments up to the first one holding
/// a `*` form the base path.
///
/// Patterns without a scheme and host are scanned the same way, so their
/// leading segments are silently skipped: `*example.com/api/*` yields an
/// empty base path.
///
/// # Examples
///
/// ```
/// use pagerule2fastly::RewritePlan;
///
/// let plan = RewritePlan::from_pattern("https://www.example.com/api/v1/*");
/// assert_eq!(plan.base_path, "/api/v1");
/// assert_eq!(plan.capture_regex, "^/api/v1/(.*)$");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewritePlan {
    /// Literal path prefix, each segment written as `/segment`.
    pub base_path: String,
    /// Anchored regex capturing everything after the base path in group 1.
    pub capture_regex: String,
}

impl RewritePlan {
    /// Derive the plan from a URL pattern.
    pub fn from_pattern(url_pattern: &str) -> Self {
        let base_path: String = url_pattern
            .split('/')
            .skip(FIRST_PATH_SEGMENT)
            .take_while(|segment| !segment.contains('*'))
            .map(|segment| format!("/{segment}"))
            .collect();

        let capture_regex = format!("^{base_path}/(.*)$");

        debug!(url_pattern, base_path = %base_path, capture_regex = %capture_regex, "derived rewrite plan");

        Self {
            base_path,
            capture_regex,
        }
    }
}

pub(super) fn generate(rule: &Rule, condition: &str) -> TranslationResult {
    let plan = RewritePlan::from_pattern(&rule.url_pattern);
    let regex = &plan.capture_regex;
    let header = &rule.capture_header;
    let target = &rule.rewrite_target;

    let cli = format!(
        "# WARNING: This complex logic must be handled with VCL Snippets or Compute@Edge.\n\
         # The CLI defines the condition. The core capture/rewrite logic is VCL.\n{}",
        create_condition("CF_Rewrite_Condition", condition)
    );

    let vcl = format!(
        r##"// VCL Snippet: vcl_recv (Apply this in the VCL Snippets tab)
// This code captures the content of the wildcard (*) in the path, saves it to a header,
// and then rewrites the request URL before sending to the origin.
if ({condition}) {{
    // 1. Capture the content matching the wildcard into the custom header: {header}
    // The pattern {regex} captures everything after the fixed path component into group 1.
    set req.http.{header} = regsub(req.url, "{regex}", "\1");

    // 2. Rewrite the URL path, using string concatenation to append the captured value.
    // Ensure the rewrite_target is URL-encoded if necessary.
    set req.url = "{target}" + req.http.{header};

    // Log the change for debugging (optional)
    synthetic("Captured: " req.http.{header} " Rewritten to: " req.url);

    // Resume processing request with the new URL
    return(restart);
}}
"##
    );

    TranslationResult {
        title: "URL Path Rewrite & Capture".to_string(),
        description:
            "Uses VCL's 'regsub' to extract the wildcard content into a header, then rewrites the URL."
                .to_string(),
        cli,
        vcl,
    }
}

//! Fastly CLI and VCL snippet generation.

mod cache;
mod redirect;
mod rewrite;
mod security;

pub use rewrite::RewritePlan;

use crate::rule::{ActionType, Rule};
use serde::Serialize;
use tracing::debug;

/// Placeholder substituted for the Fastly service ID.
pub const SERVICE_ID: &str = "YOUR_SERVICE_ID";

/// Placeholder substituted for the service version.
pub const VERSION_NUMBER: &str = "VERSION_NUMBER";

/// Generated Fastly configuration for one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationResult {
    /// Short heading for the translation.
    pub title: String,
    /// How the Fastly side implements the rule. Empty for placeholders.
    pub description: String,
    /// `fastly` CLI commands.
    pub cli: String,
    /// Raw VCL snippet. Empty when there is nothing to show.
    pub vcl: String,
}

impl TranslationResult {
    fn placeholder(title: &str, cli: &str) -> Self {
        Self {
            title: title.to_string(),
            description: String::new(),
            cli: cli.to_string(),
            vcl: String::new(),
        }
    }

    /// Result shown before a URL pattern has been entered.
    pub fn waiting_for_input() -> Self {
        Self::placeholder(
            "Waiting for Input",
            "// Enter a Cloudflare URL pattern above to see the Fastly conversion.",
        )
    }

    /// Result shown when no action is selected.
    pub fn ready() -> Self {
        Self::placeholder("Ready", "// Select an action to generate configuration.")
    }

    /// Whether this is one of the placeholder results.
    pub fn is_placeholder(&self) -> bool {
        self.vcl.is_empty()
    }
}

/// Generate the Fastly configuration for `rule`, gated on `condition`.
///
/// Pure: the same inputs always produce the same output. Parameters of
/// actions other than the selected one are ignored.
///
/// # Examples
///
/// ```
/// use pagerule2fastly::{compile_condition, generate, ActionType, Rule};
///
/// let rule = Rule {
///     url_pattern: "*example.com/*".to_string(),
///     action_type: Some(ActionType::Redirect),
///     redirect_type: "302".to_string(),
///     ..Rule::default()
/// };
/// let result = generate(&rule, &compile_condition(&rule.url_pattern));
/// assert!(result.vcl.contains(r#"error 302 "Found";"#));
/// ```
pub fn generate(rule: &Rule, condition: &str) -> TranslationResult {
    if rule.url_pattern.is_empty() {
        return TranslationResult::waiting_for_input();
    }

    let Some(action) = rule.action_type else {
        return TranslationResult::ready();
    };

    debug!(action = %action, condition, "generating snippet");

    match action {
        ActionType::Cache => cache::generate(rule, condition),
        ActionType::Redirect => redirect::generate(rule, condition),
        ActionType::Security => security::generate(rule, condition),
        ActionType::Rewrite => rewrite::generate(rule, condition),
    }
}

/// Numbered `fastly condition create` step that opens most CLI blocks.
fn condition_command(url_pattern: &str, name: &str, condition: &str) -> String {
    format!(
        "# 1. Define the Condition (Rule: {url_pattern})\n{}",
        create_condition(name, condition)
    )
}

/// `fastly condition create` for a request condition.
fn create_condition(name: &str, condition: &str) -> String {
    format!(
        r#"fastly condition create --service-id {SERVICE_ID} --version {VERSION_NUMBER} \
    --name "{name}" --type "REQUEST" \
    --statement "{condition}"
"#
    )
}

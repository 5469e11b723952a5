//! High-level translator API for converting Page Rules to Fastly configuration.

use crate::codegen::{self, TranslationResult};
use crate::pattern::compile_condition;
use crate::result::TranslateError;
use crate::rule::Rule;
use std::path::Path;
use tracing::debug;

/// Translate a rule into Fastly CLI commands and a VCL snippet.
///
/// # Example
///
/// ```rust
/// use pagerule2fastly::{translate, ActionType, Rule};
///
/// let rule = Rule {
///     url_pattern: "*.example.com/*".to_string(),
///     action_type: Some(ActionType::Security),
///     security_header: "hsts".to_string(),
///     ..Rule::default()
/// };
///
/// let result = translate(&rule);
/// assert_eq!(result.title, "Security Header: Strict-Transport-Security");
/// println!("{}", result.cli);
/// ```
pub fn translate(rule: &Rule) -> TranslationResult {
    let condition = compile_condition(&rule.url_pattern);
    codegen::generate(rule, &condition)
}

/// Load a rule from a TOML or JSON file.
///
/// Files ending in `.json` are read as JSON, everything else as TOML. Fields
/// missing from the file take their [`Rule::default`] values.
pub fn load_rule<P: AsRef<Path>>(path: P) -> Result<Rule, TranslateError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| TranslateError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    debug!(path = %path.display(), json = is_json, "loading rule");

    let rule = if is_json {
        serde_json::from_str(&text)?
    } else {
        toml::from_str(&text)?
    };
    Ok(rule)
}

/// Translate a rule file.
///
/// # Example
///
/// ```rust,no_run
/// use pagerule2fastly::translate_file;
///
/// let result = translate_file("rules/assets-cache.toml")?;
/// std::fs::write("assets-cache.vcl", result.vcl)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn translate_file<P: AsRef<Path>>(path: P) -> Result<TranslationResult, TranslateError> {
    Ok(translate(&load_rule(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::ActionType;

    #[test]
    fn test_translate_default_rule() {
        let result = translate(&Rule::default());
        assert_eq!(result.title, "URL Path Rewrite & Capture");
        assert!(result
            .cli
            .contains(r#"--statement "req.url ~ "https://www\.example\.com/api/v1/.*"""#));
    }

    #[test]
    fn test_translate_is_deterministic() {
        let rule = Rule {
            action_type: Some(ActionType::Cache),
            ..Rule::default()
        };
        assert_eq!(translate(&rule), translate(&rule));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_rule("/nonexistent/rule.toml").unwrap_err();
        assert!(matches!(err, TranslateError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/rule.toml"));
    }
}

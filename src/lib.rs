//! pagerule2fastly: Cloudflare Page Rule to Fastly configuration translator
//!
//! Given a Cloudflare Page Rule (URL pattern, action and the action's
//! parameters), pagerule2fastly produces a mechanical first draft of the
//! equivalent Fastly configuration: `fastly` CLI commands plus a raw VCL
//! snippet. The output is not validated; treat it as a starting point for a
//! migration, not a deployable configuration.
//!
//! # Features
//!
//! - **Pure translation**: no I/O, no shared state, same input same output
//! - **Four action families**: cache TTL override, redirect, security
//!   header, path rewrite with wildcard capture
//! - **Condition preview**: test sample hosts/URLs against a compiled condition
//! - **Advisory helpers**: optional snippet explanation and practice
//!   suggestions through a text-generation service, with rate-limit retries
//!
//! # Quick Start
//!
//! ```rust
//! use pagerule2fastly::{translate, ActionType, Rule};
//!
//! let rule = Rule {
//!     url_pattern: "*example.com/assets/*".to_string(),
//!     action_type: Some(ActionType::Cache),
//!     cache_ttl: "120".to_string(),
//!     ..Rule::default()
//! };
//!
//! let result = translate(&rule);
//! assert_eq!(result.title, "Caching/TTL Override");
//! assert!(result.cli.contains("--ttl 120s --stale-ttl 120s"));
//! assert!(result.vcl.contains(r#"if (req.url ~ "example\.com/assets/.*") {"#));
//! ```
//!
//! # Patterns
//!
//! A leading `*.` tests the host, anything else tests the URL. Dots are
//! escaped and every `*` becomes `.*`:
//!
//! | Pattern                   | Condition                              |
//! |---------------------------|----------------------------------------|
//! | `*.example.com`           | `req.http.host ~ "example\.com"`       |
//! | `*example.com/assets/*`   | `req.url ~ "example\.com/assets/.*"`   |
//!
//! Generated CLI blocks use the placeholders `YOUR_SERVICE_ID` and
//! `VERSION_NUMBER`; replace them with your own service details.

#![warn(missing_docs)]

pub mod advisor;
mod codegen;
mod pattern;
mod result;
mod rule;
mod translator;

// Public API exports
pub use codegen::{generate, RewritePlan, TranslationResult, SERVICE_ID, VERSION_NUMBER};
pub use pattern::{compile_condition, Condition, ConditionMatcher, MatchField};
pub use result::{ConditionMatch, PatternError, TranslateError};
pub use rule::{
    ActionType, RedirectStatus, Rule, SecurityHeader, UnknownAction, DEFAULT_CACHE_TTL_SECS,
};
pub use translator::{load_rule, translate, translate_file};

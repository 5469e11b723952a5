//! Error types for pagerule2fastly

use std::path::PathBuf;
use thiserror::Error;

/// Errors related to previewing a compiled condition.
///
/// Translation itself never fails. These errors only appear when a condition
/// is turned into a real regex to test sample requests against it.
#[derive(Error, Debug)]
pub enum PatternError {
    /// The condition's regex body is not valid regex syntax.
    ///
    /// The compiler passes metacharacters other than `*` and `.` through
    /// untouched, so a pattern such as `*example.com/(*` produces a condition
    /// that Fastly would also reject.
    #[error("Invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// The condition string does not have the `<field> ~ "<regex>"` shape.
    #[error("Malformed condition: {0}")]
    MalformedCondition(String),
}

/// Errors that can occur while loading a rule from disk.
///
/// # Examples
///
/// ```no_run
/// use pagerule2fastly::{translate_file, TranslateError};
///
/// match translate_file("rule.toml") {
///     Ok(result) => println!("{}", result.cli),
///     Err(TranslateError::Io { path, source }) => {
///         eprintln!("cannot read {}: {}", path.display(), source);
///     }
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum TranslateError {
    /// The rule file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The rule file is not valid TOML.
    #[error("Invalid TOML rule: {0}")]
    Toml(#[from] toml::de::Error),

    /// The rule file is not valid JSON.
    #[error("Invalid JSON rule: {0}")]
    Json(#[from] serde_json::Error),
}

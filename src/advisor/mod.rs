//! Advisory features backed by a third-party text-generation service.
//!
//! These calls are optional helpers around the translator: explaining a
//! generated VCL snippet and suggesting practices for an action. Translation
//! never waits on them.
//!
//! # Example
//!
//! ```rust,no_run
//! use pagerule2fastly::advisor::{Advisor, AdvisorConfig, GeminiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AdvisorConfig::default().with_env_overrides();
//!     let advisor = Advisor::new(GeminiClient::new(&config)?, config.retry);
//!
//!     let tips = advisor.suggest_practices("cache", "*example.com/assets/*").await;
//!     println!("{}", tips);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;

pub use client::GeminiClient;
pub use config::{AdvisorConfig, RetryPolicy, API_KEY_ENV};
pub use error::{AdvisorError, ConfigError};

use std::future::Future;
use tracing::{error, warn};

const EXPLAIN_SYSTEM_PROMPT: &str = "You are an expert Fastly Varnish Configuration Language (VCL) developer. Your task is to analyze the provided VCL snippet, explain its purpose clearly and concisely, and point out any potential VCL lifecycle issues or common pitfalls, especially related to caching or request flow. Respond using markdown formatting.";

const PRACTICES_SYSTEM_PROMPT: &str = "You are a senior Fastly Architect. Provide 3 highly relevant, concise best practices related to the user's configuration action. Format the response as a simple markdown bulleted list.";

/// A single text-generation attempt.
///
/// Implementations report a `429` as [`AdvisorError::RateLimited`] so the
/// retry loop can recognize it.
pub trait TextGenerator {
    /// Generate text for `query` under `system_prompt`.
    fn generate(
        &self,
        query: &str,
        system_prompt: &str,
    ) -> impl Future<Output = Result<String, AdvisorError>> + Send;
}

/// Call the service, retrying rate-limited attempts with exponential backoff.
///
/// A rate limit on the final attempt is reported as `Status(429)`. Any other
/// error ends the loop immediately.
pub async fn call_text_generation_service<G: TextGenerator>(
    generator: &G,
    policy: &RetryPolicy,
    query: &str,
    system_prompt: &str,
) -> Result<String, AdvisorError> {
    for attempt in 0..policy.max_attempts {
        match generator.generate(query, system_prompt).await {
            Err(AdvisorError::RateLimited) if attempt + 1 < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "rate limited, retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }
            Err(AdvisorError::RateLimited) => return Err(AdvisorError::Status(429)),
            other => return other,
        }
    }
    Err(AdvisorError::RetriesExhausted)
}

/// Extra context for the practices prompt, per action.
fn practice_context(action_type: &str) -> &'static str {
    match action_type {
        "cache" => "common caching and TTL optimization practices, including Surrogate Keys or Stale-While-Revalidate.",
        "redirect" => "best practices for edge redirects, considering VCL lifecycle and status codes.",
        "security" => "recommended security practices for headers and TLS configuration.",
        "rewrite" => "complex URL manipulation and path capture best practices.",
        _ => "general Fastly configuration tips.",
    }
}

/// Explains snippets and suggests practices.
///
/// Results are always text: failures are rendered as `Error: <reason>` so a
/// caller can display them in place of the answer.
#[derive(Debug, Clone)]
pub struct Advisor<G> {
    generator: G,
    policy: RetryPolicy,
}

impl<G: TextGenerator> Advisor<G> {
    /// Create an advisor around a generator.
    pub fn new(generator: G, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    /// Explain a VCL snippet. An empty snippet yields an empty string without
    /// calling the service.
    pub async fn explain_snippet(&self, snippet: &str) -> String {
        if snippet.is_empty() {
            return String::new();
        }

        let query = format!("Analyze this VCL snippet:\n\n{}", snippet);
        self.ask(&query, EXPLAIN_SYSTEM_PROMPT, "Could not retrieve explanation.")
            .await
    }

    /// Suggest three practices for an action at a URL pattern. An empty action
    /// yields an empty string without calling the service.
    pub async fn suggest_practices(&self, action_type: &str, url_pattern: &str) -> String {
        if action_type.is_empty() {
            return String::new();
        }

        let query = format!(
            "The user is implementing a Fastly rule for: {} at URL pattern: {}. What are 3 best practices or advanced tips related to {}?",
            action_type,
            url_pattern,
            practice_context(action_type)
        );
        self.ask(&query, PRACTICES_SYSTEM_PROMPT, "Could not retrieve suggestions.")
            .await
    }

    async fn ask(&self, query: &str, system_prompt: &str, empty_message: &str) -> String {
        match call_text_generation_service(&self.generator, &self.policy, query, system_prompt)
            .await
        {
            Ok(text) => text,
            Err(AdvisorError::EmptyResponse) => format!("Error: {}", empty_message),
            Err(e) => {
                error!(error = %e, "text generation failed");
                format!("Error: {}", e)
            }
        }
    }
}

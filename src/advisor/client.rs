//! Gemini `generateContent` client.

use super::config::AdvisorConfig;
use super::error::AdvisorError;
use super::TextGenerator;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("cf2fastly/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    system_instruction: Content<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn new(query: &'a str, system_prompt: &'a str) -> Self {
        Self {
            contents: [Content {
                parts: [Part { text: query }],
            }],
            system_instruction: Content {
                parts: [Part {
                    text: system_prompt,
                }],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.is_empty())
    }
}

/// HTTP client for the Gemini generative language API.
///
/// Each [`generate`](TextGenerator::generate) call is a single attempt; retries
/// are handled by [`call_text_generation_service`](super::call_text_generation_service).
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    url: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client from configuration.
    pub fn new(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;

        let api_key = config.api_key.clone().unwrap_or_else(|| {
            warn!("no API key configured, requests will likely be rejected");
            String::new()
        });

        Ok(Self {
            http,
            url: generate_url(&config.endpoint, &config.model),
            api_key,
        })
    }
}

fn generate_url(endpoint: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        endpoint.trim_end_matches('/'),
        model
    )
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, query: &str, system_prompt: &str) -> Result<String, AdvisorError> {
        debug!(url = %self.url, query_len = query.len(), "calling text generation service");

        let response = self
            .http
            .post(&self.url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&GenerateRequest::new(query, system_prompt))
            .send()
            .await
            .map_err(|e| AdvisorError::Connection(e.without_url()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AdvisorError::RateLimited);
        }
        if !status.is_success() {
            return Err(AdvisorError::Status(status.as_u16()));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::Decode(e.without_url().to_string()))?;

        body.into_text().ok_or(AdvisorError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{Advisor, RetryPolicy};
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const KEY: &str = "SECRET123";

    fn response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    /// Answers one connection per canned response and records each raw request.
    async fn serve(responses: Vec<String>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        tokio::spawn(async move {
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let request = read_request(&mut socket).await;
                log.lock().unwrap().push(request);
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), requests)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let length = text[..head_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn config_for(endpoint: &str) -> AdvisorConfig {
        AdvisorConfig {
            endpoint: endpoint.to_string(),
            api_key: Some(KEY.to_string()),
            timeout_secs: 5,
            retry: RetryPolicy {
                max_attempts: 3,
                initial_backoff_ms: 1,
            },
            ..AdvisorConfig::default()
        }
    }

    async fn closed_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[test]
    fn request_shape() {
        let request = GenerateRequest::new("explain", "be brief");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "contents": [{ "parts": [{ "text": "explain" }] }],
                "systemInstruction": { "parts": [{ "text": "be brief" }] },
            })
        );
    }

    #[test]
    fn response_text_extraction() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"- tip one"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(body.into_text().as_deref(), Some("- tip one"));
    }

    #[test]
    fn response_without_text() {
        let body: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(body.into_text().is_none());

        let body: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(body.into_text().is_none());

        let body: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#)
                .unwrap();
        assert!(body.into_text().is_none());
    }

    #[test]
    fn url_building() {
        assert_eq!(
            generate_url("https://example.test/v1beta/", "m"),
            "https://example.test/v1beta/models/m:generateContent"
        );
    }

    #[test]
    fn client_builds_without_key() {
        let client = GeminiClient::new(&AdvisorConfig::default()).unwrap();
        assert!(client.api_key.is_empty());
        assert!(client.url.ends_with(":generateContent"));
    }

    #[tokio::test]
    async fn too_many_requests_maps_to_rate_limited() {
        let (endpoint, _) = serve(vec![response("429 Too Many Requests", "")]).await;
        let client = GeminiClient::new(&config_for(&endpoint)).unwrap();

        let err = client.generate("q", "s").await.unwrap_err();
        assert!(matches!(err, AdvisorError::RateLimited));
    }

    #[tokio::test]
    async fn other_failures_map_to_status() {
        let (endpoint, _) = serve(vec![response("503 Service Unavailable", "")]).await;
        let client = GeminiClient::new(&config_for(&endpoint)).unwrap();

        let err = client.generate("q", "s").await.unwrap_err();
        assert!(matches!(err, AdvisorError::Status(503)));
    }

    #[tokio::test]
    async fn success_returns_text_and_keeps_key_out_of_url() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"explained"}]}}]}"#;
        let (endpoint, requests) = serve(vec![response("200 OK", body)]).await;
        let client = GeminiClient::new(&config_for(&endpoint)).unwrap();

        let text = client.generate("q", "s").await.unwrap();
        assert_eq!(text, "explained");

        let requests = requests.lock().unwrap();
        let request = &requests[0];
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("POST "));
        assert!(request_line
            .ends_with("/models/gemini-2.5-flash-preview-09-2025:generateContent HTTP/1.1"));
        assert!(!request_line.contains(KEY));
        assert!(request
            .to_ascii_lowercase()
            .contains(&format!("x-goog-api-key: {}", KEY).to_ascii_lowercase()));
        assert!(request.contains(r#""systemInstruction""#));
    }

    #[tokio::test]
    async fn undecodable_body_maps_to_decode() {
        let (endpoint, _) = serve(vec![response("200 OK", "not json")]).await;
        let client = GeminiClient::new(&config_for(&endpoint)).unwrap();

        let err = client.generate("q", "s").await.unwrap_err();
        assert!(matches!(err, AdvisorError::Decode(_)));
        assert!(!err.to_string().contains(KEY));
    }

    #[tokio::test]
    async fn refused_connection_maps_to_connection() {
        let client = GeminiClient::new(&config_for(&closed_endpoint().await)).unwrap();

        let err = client.generate("q", "s").await.unwrap_err();
        assert!(matches!(err, AdvisorError::Connection(_)));
    }

    #[tokio::test]
    async fn connection_error_text_omits_key() {
        let config = config_for(&closed_endpoint().await);
        let advisor = Advisor::new(GeminiClient::new(&config).unwrap(), config.retry);

        let text = advisor.explain_snippet("x").await;
        assert!(text.starts_with("Error: Failed to connect to AI service."));
        assert!(!text.contains(KEY));
        assert!(!text.contains("generateContent"));
    }

    #[tokio::test]
    async fn advisor_retries_rate_limits_from_service() {
        let limited = response("429 Too Many Requests", "");
        let (endpoint, requests) = serve(vec![limited.clone(), limited.clone(), limited]).await;
        let config = config_for(&endpoint);
        let advisor = Advisor::new(GeminiClient::new(&config).unwrap(), config.retry);

        let text = advisor.explain_snippet("x").await;
        assert_eq!(text, "Error: API returned status 429");
        assert_eq!(requests.lock().unwrap().len(), 3);
    }
}

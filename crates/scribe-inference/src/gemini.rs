//! Hosted Gemini chat backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use scribe_core::{ChatBackend, ChatTurn, Error, Result};

/// Default API endpoint.
pub const DEFAULT_GEMINI_URL: &str = scribe_core::defaults::GEMINI_BASE_URL;

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = scribe_core::defaults::GEN_MODEL;

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = scribe_core::defaults::GEN_TIMEOUT_SECS;

/// Configuration for the Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL (override for proxies and tests).
    pub base_url: String,
    /// API key sent via the `x-goog-api-key` header.
    pub api_key: String,
    /// Generation model name.
    pub model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Read configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | GEMINI_API_KEY | (required) |
    /// | GEMINI_BASE_URL | https://generativelanguage.googleapis.com |
    /// | GEMINI_MODEL | gemini-1.5-flash |
    /// | SCRIBE_GEN_TIMEOUT_SECS | 120 |
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| Error::Config("GEMINI_API_KEY is not set".to_string()))?;
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_GEMINI_URL.to_string());
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEN_MODEL.to_string());
        let timeout_secs = std::env::var("SCRIBE_GEN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(GEN_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            api_key,
            model,
            timeout_secs,
        })
    }
}

/// Gemini chat backend.
///
/// Stateless wrapper over `models/{model}:generateContent`: each call carries
/// the full seeded history plus one live message. Constructed once at startup
/// and injected wherever a [`ChatBackend`] is needed.
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    /// Create a new Gemini backend from explicit configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "gemini",
            model = %config.model,
            "Initializing Gemini backend"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Get the active configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }
}

/// One content block of a `generateContent` conversation.
#[derive(Serialize, Deserialize, Clone)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Clone)]
struct Part {
    text: String,
}

/// Request payload for `models/{model}:generateContent`.
#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

/// Response from `models/{model}:generateContent`.
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate. Empty when the model
    /// produced no candidates or no text parts; callers own any fallback.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

fn turn_to_content(turn: &ChatTurn) -> Content {
    Content {
        role: turn.role.as_str().to_string(),
        parts: vec![Part {
            text: turn.text.clone(),
        }],
    }
}

#[async_trait]
impl ChatBackend for GeminiBackend {
    #[instrument(skip(self, history, message), fields(subsystem = "inference", component = "gemini", op = "chat", model = %self.config.model, history_len = history.len(), prompt_len = message.len()))]
    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String> {
        let start = Instant::now();

        let mut contents: Vec<Content> = history.iter().map(turn_to_content).collect();
        contents.push(Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: message.to_string(),
            }],
        });

        let request = GenerateContentRequest { contents };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result.text();
        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = content.len(),
            duration_ms = elapsed,
            "Chat complete"
        );
        if elapsed > scribe_core::defaults::SLOW_GEN_THRESHOLD_MS {
            warn!(
                duration_ms = elapsed,
                prompt_len = message.len(),
                slow = true,
                "Slow generation operation"
            );
        }
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::TurnRole;

    fn test_backend(base_url: &str) -> GeminiBackend {
        GeminiBackend::new(GeminiConfig {
            base_url: base_url.to_string(),
            api_key: "test-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerateContentRequest {
            contents: vec![
                Content {
                    role: "user".to_string(),
                    parts: vec![Part {
                        text: "Here are the notes".to_string(),
                    }],
                },
                Content {
                    role: "model".to_string(),
                    parts: vec![Part {
                        text: "<p>ok</p>".to_string(),
                    }],
                },
            ],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Here are the notes");
        assert_eq!(json["contents"][1]["role"], "model");
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "<p>buy "}, {"text": "milk</p>"}]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), "<p>buy milk</p>");
    }

    #[test]
    fn test_response_without_candidates_is_empty_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_turn_roles_map_to_wire_roles() {
        let content = turn_to_content(&ChatTurn {
            role: TurnRole::Model,
            text: "prior answer".to_string(),
        });
        assert_eq!(content.role, "model");
        assert_eq!(content.parts[0].text, "prior answer");
    }

    #[test]
    fn test_endpoint_includes_model() {
        let backend = test_backend("http://localhost:9999");
        assert_eq!(
            backend.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_chat_round_trip_against_stub_server() {
        use wiremock::matchers::{body_partial_json, header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "instruction"}]},
                    {"role": "user", "parts": [{"text": "Q1"}]}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [
                    {"content": {"role": "model", "parts": [{"text": "<p>answer</p>"}]}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let history = vec![ChatTurn::user("instruction")];
        let answer = backend.chat(&history, "Q1").await.unwrap();
        assert_eq!(answer, "<p>answer</p>");
    }

    #[tokio::test]
    async fn test_chat_maps_http_error_to_inference_error() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let err = backend.chat(&[], "Q1").await.unwrap_err();
        match err {
            Error::Inference(msg) => {
                assert!(msg.contains("429"), "got: {}", msg);
                assert!(msg.contains("quota exceeded"), "got: {}", msg);
            }
            other => panic!("Expected Inference error, got {:?}", other),
        }
    }
}

//! Gemini text-generation backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use wikirelay_core::{Error, GeminiConfig, GenerationBackend, Result};

/// Gemini inference backend for single-turn prompt completion.
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    /// Create a backend from explicit configuration.
    pub fn new(config: GeminiConfig) -> Self {
        info!(
            "Initializing Gemini backend: url={}, model={}",
            config.base_url, config.model
        );
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Create from environment variables (`GEMINI_API_KEY` required).
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(GeminiConfig::from_env()?))
    }
}

/// Request payload for the `generateContent` endpoint.
#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

/// Response from the `generateContent` endpoint. Only the first
/// candidate's text is of interest; everything else is ignored.
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    #[instrument(skip(self, prompt), fields(component = "gemini", op = "generate", model = %self.config.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Gemini API error ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let text = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Error::Inference("Unexpected API response structure".to_string()))?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = text.len(),
            duration_ms = elapsed,
            "Generation complete"
        );
        if elapsed > 30000 {
            warn!(duration_ms = elapsed, slow = true, "Slow generation call");
        }

        Ok(text.trim().to_string())
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_serialization() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".to_string(),
                }],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_generate_response_deserialization() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "result text"}], "role": "model"}}
            ],
            "usageMetadata": {"promptTokenCount": 12}
        }"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        let text = response.candidates[0]
            .content
            .as_ref()
            .map(|c| c.parts[0].text.clone());
        assert_eq!(text.as_deref(), Some("result text"));
    }

    #[test]
    fn test_generate_response_tolerates_empty_candidates() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
    }

    #[test]
    fn test_model_name_accessor() {
        let backend = GeminiBackend::new(GeminiConfig::new("http://test", "key"));
        assert_eq!(backend.model_name(), "gemini-2.0-flash");
    }
}

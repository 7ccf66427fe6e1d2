//! Wire access to the generative model.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{AdvisorError, ChatMessage, Role};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

/// One generation round: the whole conversation so far, last turn included.
#[derive(Clone, Copy, Debug)]
pub struct ChatRequest<'a> {
    pub system_instruction: &'a str,
    pub contents: &'a [ChatMessage],
}

#[async_trait]
pub trait ChatTransport: Send + Sync + Debug {
    /// Returns the reply text, possibly empty.
    async fn generate(&self, request: ChatRequest<'_>) -> Result<String, AdvisorError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// `generateContent` over HTTPS.
#[derive(Clone, Debug)]
pub struct GeminiTransport {
    client: Client,
    config: AdvisorConfig,
}

impl GeminiTransport {
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl ChatTransport for GeminiTransport {
    async fn generate(&self, request: ChatRequest<'_>) -> Result<String, AdvisorError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AdvisorError::MissingApiKey)?;

        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.system_instruction,
                }],
            },
            contents: request
                .contents
                .iter()
                .map(|message| Content {
                    role: Some(match message.role {
                        Role::User => "user",
                        Role::Model => "model",
                    }),
                    parts: vec![Part {
                        text: &message.text,
                    }],
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            let reply = resp.json::<GenerateResponse>().await?;
            return Ok(reply_text(reply));
        }

        let message = match resp.json::<ErrorBody>().await {
            Ok(err) => err.error.message,
            Err(_) => "server error".to_string(),
        };
        Err(AdvisorError::Server { status, message })
    }
}

fn reply_text(reply: GenerateResponse) -> String {
    reply
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_model() {
        let transport = GeminiTransport::new(AdvisorConfig {
            base_url: "http://localhost:8080/v1beta/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            transport.url(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn reply_concatenates_first_candidate_parts() {
        let reply: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"You spent "},{"text":"**$12,500.00**"}]}},{"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(reply_text(reply), "You spent **$12,500.00**");

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(reply_text(empty), "");
    }

    #[test]
    fn request_body_uses_camel_case() {
        let history = [ChatMessage::user("hi")];
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: "sys" }],
            },
            contents: history
                .iter()
                .map(|m| Content {
                    role: Some("user"),
                    parts: vec![Part { text: &m.text }],
                })
                .collect(),
            generation_config: GenerationConfig { temperature: 0.7 },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "sys");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
        assert!(value["generationConfig"]["temperature"].is_number());
    }
}

//! Google Gemini provider (Gemini 2.0 Flash, 2.5 Flash, 2.5 Pro).
//!
//! Talks to the native `models/{model}:generateContent` endpoint of the
//! Generative Language API, authenticating with the `key` query parameter.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AiProvider, ProviderError};
use crate::types::{ChatMessage, ChatRequest, ChatResponse, FinishReason, MessageRole, TokenUsage};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Content,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Google Gemini API provider.
pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// Pass an empty string for `api_key` to create an unavailable provider;
    /// every call then fails with [`ProviderError::InvalidKey`].
    pub fn new(api_key: String) -> Self {
        Self {
            api_key: if api_key.is_empty() {
                None
            } else {
                Some(api_key)
            },
            base_url: DEFAULT_BASE_URL.into(),
            client: build_client(DEFAULT_TIMEOUT),
        }
    }

    /// Point the provider at a different API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the HTTP client with one using the given request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Convert generic messages to the Gemini `contents` array. System turns
    /// are folded into `systemInstruction` instead.
    fn convert_messages(messages: &[ChatMessage]) -> Vec<Content> {
        messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| Content {
                role: Some(
                    match m.role {
                        MessageRole::Assistant => "model",
                        _ => "user",
                    }
                    .into(),
                ),
                parts: vec![Part {
                    text: Some(m.content.clone()),
                }],
            })
            .collect()
    }

    fn system_instruction(request: &ChatRequest) -> Option<Content> {
        let mut texts: Vec<String> = request.system_prompt.iter().cloned().collect();
        texts.extend(
            request
                .messages
                .iter()
                .filter(|m| m.role == MessageRole::System)
                .map(|m| m.content.clone()),
        );
        if texts.is_empty() {
            return None;
        }
        Some(Content {
            role: None,
            parts: vec![Part {
                text: Some(texts.join("\n\n")),
            }],
        })
    }

    /// Build the JSON request body.
    fn build_body(request: &ChatRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: Self::convert_messages(&request.messages),
            system_instruction: Self::system_instruction(request),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        }
    }

    /// Get the API key or return an error.
    fn require_key(&self) -> Result<&str, ProviderError> {
        self.api_key.as_deref().ok_or(ProviderError::InvalidKey)
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Send a POST to the generateContent endpoint.
    async fn post_generate(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<reqwest::Response, ProviderError> {
        let key = self.require_key()?;
        let url = self.endpoint(model);

        let resp = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        check_status(resp, model).await
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Map HTTP error codes to typed errors.
async fn check_status(
    resp: reqwest::Response,
    model: &str,
) -> Result<reqwest::Response, ProviderError> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(ProviderError::InvalidKey);
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimit);
    }
    if status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status == reqwest::StatusCode::GATEWAY_TIMEOUT
    {
        return Err(ProviderError::Timeout);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ProviderError::ModelUnavailable(model.to_string()));
    }
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(ProviderError::Other(format!(
            "Gemini API error {status}: {text}"
        )));
    }
    Ok(resp)
}

/// Decode a successful generateContent body into a [`ChatResponse`].
async fn parse_response(
    resp: reqwest::Response,
    model: &str,
) -> Result<ChatResponse, ProviderError> {
    let data: GenerateContentResponse = resp
        .json()
        .await
        .map_err(|e| ProviderError::Other(format!("JSON parse error: {e}")))?;

    let candidate = data.candidates.first().ok_or(ProviderError::EmptyResponse)?;

    let content: String = candidate
        .content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();

    let finish_reason = match candidate.finish_reason.as_deref() {
        Some("STOP") | None => FinishReason::Stop,
        Some("MAX_TOKENS") => FinishReason::Length,
        Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
            FinishReason::ContentFilter
        }
        Some(_) => FinishReason::Error,
    };

    let usage = data
        .usage_metadata
        .map(|u| {
            let p = u.prompt_token_count.unwrap_or(0);
            let c = u.candidates_token_count.unwrap_or(0);
            TokenUsage {
                prompt_tokens: p,
                completion_tokens: c,
                total_tokens: u.total_token_count.unwrap_or(p + c),
            }
        })
        .unwrap_or_default();

    Ok(ChatResponse {
        content,
        model: data.model_version.unwrap_or_else(|| model.to_string()),
        usage,
        finish_reason,
    })
}

#[async_trait]
impl AiProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Google Gemini"
    }

    async fn is_available(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Non-streaming completion.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let body = Self::build_body(request);
        debug!(model = %request.model, "Sending Gemini generateContent request");
        let resp = self.post_generate(&request.model, &body).await?;
        parse_response(resp, &request.model).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

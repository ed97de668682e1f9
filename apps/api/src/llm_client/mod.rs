/// LLM Client — the single point of entry for all chat-completion calls.
///
/// No other module talks to OpenAI or Gemini directly. Handlers and pipelines depend on
/// the `ChatModel` trait so tests can swap in a scripted model.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{Config, LlmProvider};

pub mod prompts;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;
const DEFAULT_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("{0} API key is not configured")]
    NotConfigured(&'static str),
}

/// One prompt/system pair sent to the model.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    /// Retry 429/5xx responses with exponential backoff.
    pub retry: bool,
}

impl<'a> ChatRequest<'a> {
    pub fn new(system: &'a str, prompt: &'a str) -> Self {
        Self {
            system,
            prompt,
            temperature: DEFAULT_TEMPERATURE,
            retry: true,
        }
    }

    /// Single attempt only. Used by the CV extraction call.
    pub fn without_retries(mut self) -> Self {
        self.retry = false;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Anything that turns a prompt into reply text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String, LlmError>;
}

// ── OpenAI wire types ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<OpenAiMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiReply,
}

#[derive(Debug, Deserialize)]
struct OpenAiReply {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

// ── Gemini wire types ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiReplyContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiReplyContent {
    #[serde(default)]
    parts: Vec<GeminiReplyPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiReplyPart {
    text: Option<String>,
}

impl GeminiResponse {
    fn text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        Some(text)
    }
}

/// The production chat model. Wraps either the OpenAI chat-completions API or the
/// Gemini generateContent API with retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    provider: LlmProvider,
    api_key: Option<String>,
    model: String,
    openai_base_url: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let model = match config.llm_provider {
            LlmProvider::OpenAi => config.openai_model.clone(),
            LlmProvider::Gemini => config.gemini_model.clone(),
        };
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            provider: config.llm_provider,
            api_key: config.llm_api_key().map(str::to_string),
            model,
            openai_base_url: config.openai_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &'static str {
        match self.provider {
            LlmProvider::OpenAi => "OpenAI",
            LlmProvider::Gemini => "Gemini",
        }
    }

    fn build_request(
        &self,
        api_key: &str,
        request: &ChatRequest<'_>,
    ) -> reqwest::RequestBuilder {
        match self.provider {
            LlmProvider::OpenAi => self
                .client
                .post(format!("{}/chat/completions", self.openai_base_url))
                .bearer_auth(api_key)
                .json(&OpenAiRequest {
                    model: &self.model,
                    max_tokens: MAX_TOKENS,
                    temperature: request.temperature,
                    messages: vec![
                        OpenAiMessage {
                            role: "system",
                            content: request.system,
                        },
                        OpenAiMessage {
                            role: "user",
                            content: request.prompt,
                        },
                    ],
                }),
            LlmProvider::Gemini => self
                .client
                .post(format!("{GEMINI_API_URL}/{}:generateContent", self.model))
                .query(&[("key", api_key)])
                .json(&GeminiRequest {
                    system_instruction: GeminiContent {
                        role: None,
                        parts: vec![GeminiPart {
                            text: request.system,
                        }],
                    },
                    contents: vec![GeminiContent {
                        role: Some("user"),
                        parts: vec![GeminiPart {
                            text: request.prompt,
                        }],
                    }],
                    generation_config: GeminiGenerationConfig {
                        temperature: request.temperature,
                        max_output_tokens: MAX_TOKENS,
                    },
                }),
        }
    }

    async fn read_reply(&self, response: reqwest::Response) -> Result<String, LlmError> {
        let text = match self.provider {
            LlmProvider::OpenAi => {
                let body: OpenAiResponse = response.json().await?;
                if let Some(usage) = &body.usage {
                    debug!(
                        "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                        usage.prompt_tokens, usage.completion_tokens
                    );
                }
                body.choices.into_iter().next().and_then(|c| c.message.content)
            }
            LlmProvider::Gemini => {
                let body: GeminiResponse = response.json().await?;
                body.text()
            }
        };

        text.filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    /// Sends the prompt, retrying on 429 (rate limit) and 5xx errors with exponential
    /// backoff unless the request opts out.
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LlmError::NotConfigured(self.provider_name()))?;

        let attempts = if request.retry { MAX_RETRIES } else { 1 };
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.build_request(api_key, &request).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<OpenAiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            return self.read_reply(response).await;
        }

        Err(last_error.unwrap_or(LlmError::RateLimited { retries: attempts }))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Returns the first balanced `[...]` in `text` that parses as JSON, skipping brackets
/// inside JSON strings. When no candidate parses, the first balanced one is returned so
/// callers can report why it is invalid.
pub fn extract_json_array(text: &str) -> Option<&str> {
    extract_balanced(text, b'[', b']')
}

/// Same as `extract_json_array`, for `{...}`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    extract_balanced(text, b'{', b'}')
}

fn extract_balanced(text: &str, open: u8, close: u8) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut first = None;
    let mut from = 0;

    while let Some(pos) = bytes[from..].iter().position(|&b| b == open) {
        let start = from + pos;
        if let Some(candidate) = balanced_from(text, start, open, close) {
            if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
                return Some(candidate);
            }
            first.get_or_insert(candidate);
        }
        from = start + 1;
    }
    first
}

/// The balanced span opening at `start`, if it closes before the text ends.
fn balanced_from(text: &str, start: usize, open: u8, close: u8) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            _ if b == open => depth += 1,
            _ if b == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
pub mod testing {
    //! Scripted chat model for pipeline tests.

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    pub struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(text: &str) -> Self {
            Self::new(vec![Ok(text.to_string())])
        }

        pub fn failing() -> Self {
            Self::new(vec![Err(LlmError::Api {
                status: 500,
                message: "upstream exploded".to_string(),
            })])
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.prompts.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, request: ChatRequest<'_>) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }
}

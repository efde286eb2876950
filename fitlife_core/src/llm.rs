//! Generative text service client.
//!
//! The engine only needs "prompt in, text out". [`TextGenerator`] is that
//! seam; [`OpenAiClient`] talks to any OpenAI-compatible chat completions
//! endpoint over blocking HTTP with a bounded timeout. Each call is a single
//! attempt: every failure is reported as a [`GenerationError`] and the caller
//! falls back.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use crate::config::AiConfig;

/// One generation call
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
        }
    }
}

/// Why a generation call produced no text
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generative service is not configured: {0}")]
    Unavailable(String),

    #[error("could not reach {0}")]
    Connection(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response body: {0}")]
    ResponseParsing(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

pub trait TextGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

impl<G: TextGenerator + ?Sized> TextGenerator for Box<G> {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        (**self).generate(request)
    }
}

impl<G: TextGenerator + ?Sized> TextGenerator for &G {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        (**self).generate(request)
    }
}

// ============================================================================
// OpenAI-compatible client
// ============================================================================

/// Blocking client for `POST {base_url}/chat/completions`
pub struct OpenAiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs: timeout.as_secs(),
        })
    }

    /// Build a client from the `[ai]` config section, reading the key from
    /// the configured environment variable.
    pub fn from_config(config: &AiConfig) -> Result<Self, GenerationError> {
        let api_key = config.api_key().ok_or_else(|| {
            GenerationError::Unavailable(format!("{} is not set", config.api_key_env))
        })?;
        Self::new(&config.base_url, &config.model, &api_key, config.timeout())
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Request body for /chat/completions
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from /chat/completions (only the fields we read)
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Pull the first choice's text out of a raw response body.
fn extract_completion_text(body: &str) -> Result<String, GenerationError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::ResponseParsing(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| GenerationError::ResponseParsing("response has no message content".into()))
}

impl TextGenerator for OpenAiClient {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let url = self.endpoint();
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
        };

        tracing::debug!(
            "Requesting completion from {} (model {}, temperature {})",
            url,
            self.model,
            request.temperature
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    GenerationError::Connection(self.base_url.clone())
                } else {
                    GenerationError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response.text().map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout(self.timeout_secs)
            } else {
                GenerationError::HttpClient(e.to_string())
            }
        })?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        extract_completion_text(&text)
    }
}

// ============================================================================
// Non-network generators
// ============================================================================

/// Generator used when no API key is configured. Always fails, so every
/// caller takes its fallback path.
#[derive(Clone, Debug)]
pub struct UnavailableGenerator {
    reason: String,
}

impl UnavailableGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl TextGenerator for UnavailableGenerator {
    fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable(self.reason.clone()))
    }
}

/// Canned-response generator for testing. Replies are handed out in order;
/// every request is recorded for inspection.
///
/// Meant for tests and examples only; production wiring uses
/// [`OpenAiClient`] or [`UnavailableGenerator`].
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: RefCell<VecDeque<Result<String, String>>>,
    requests: RefCell<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn reply(self, text: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(text.to_string()));
        self
    }

    /// Queue a transport failure
    pub fn fail(self, message: &str) -> Self {
        self.replies.borrow_mut().push_back(Err(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.borrow().clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests.borrow_mut().push(request.clone());
        match self.replies.borrow_mut().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(GenerationError::HttpClient(message)),
            None => Err(GenerationError::Unavailable("no scripted reply left".into())),
        }
    }
}

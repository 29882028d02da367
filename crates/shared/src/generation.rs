use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::GenerationError;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";
const MAX_INPUT_CHARS: usize = 10_000;
const MAX_ATTEMPTS: u32 = 3;

/// A fixed generation task: instruction text plus output length bounds,
/// set once at setup and never changed at runtime.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub name: &'static str,
    pub instruction: &'static str,
    pub max_tokens: u32,
    pub min_chars: usize,
}

impl TaskSpec {
    pub fn summarize() -> Self {
        Self {
            name: "summarize",
            instruction: "Summarize the following text:",
            max_tokens: 400,
            min_chars: 100,
        }
    }

    pub fn professional_post() -> Self {
        Self {
            name: "professional post",
            instruction: "Turn this summary into an engaging professional post:",
            max_tokens: 300,
            min_chars: 0,
        }
    }

    pub fn micro_thread() -> Self {
        Self {
            name: "micro thread",
            instruction: "Convert this summary into a short thread of posts:",
            max_tokens: 300,
            min_chars: 0,
        }
    }

    pub fn short_script() -> Self {
        Self {
            name: "short script",
            instruction: "Convert this summary into a short video script (60 seconds):",
            max_tokens: 300,
            min_chars: 0,
        }
    }
}

/// Opaque text-generation capability: a task prompt and input text in,
/// generated text out. Injected so tests can substitute a deterministic
/// stub without any inference or network path.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, task: &TaskSpec, input: &str)
        -> std::result::Result<String, GenerationError>;
}

#[derive(Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

pub struct ClaudeGenerator {
    client: Client,
    api_key: String,
    model: String,
}

impl ClaudeGenerator {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn request_once(
        &self,
        task: &TaskSpec,
        input: &str,
    ) -> std::result::Result<String, GenerationError> {
        let prompt = format!(
            "{}\n\n{}",
            task.instruction,
            truncate_at_char_boundary(input, MAX_INPUT_CHARS)
        );

        let request = ClaudeRequest {
            model: self.model.clone(),
            max_tokens: task.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(GenerationError::Api(error_text));
        }

        let parsed = response
            .json::<ClaudeResponse>()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        let text = parsed
            .content
            .first()
            .map(|block| block.text.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GenerationError::MalformedResponse(
                "response carried no text content".to_string(),
            ));
        }

        // The API has no server-side minimum, so the task floor is
        // enforced here; an undersized output counts as malformed.
        if text.chars().count() < task.min_chars {
            return Err(GenerationError::MalformedResponse(format!(
                "output shorter than the {} minimum of {} characters",
                task.name, task.min_chars
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl Generator for ClaudeGenerator {
    async fn generate(
        &self,
        task: &TaskSpec,
        input: &str,
    ) -> std::result::Result<String, GenerationError> {
        let mut attempt = 0;
        loop {
            match self.request_once(task, input).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    attempt += 1;
                    if attempt >= MAX_ATTEMPTS {
                        return Err(e);
                    }

                    // Longer backoff for rate limits
                    let is_rate_limit =
                        matches!(&e, GenerationError::Api(msg) if msg.contains("rate_limit"));
                    let backoff = if is_rate_limit {
                        Duration::from_secs(15 * attempt as u64)
                    } else {
                        Duration::from_millis(1000 * 2_u64.pow(attempt - 1))
                    };

                    tracing::debug!(
                        "attempt {} of {} for {} failed ({}), retrying in {:?}",
                        attempt,
                        MAX_ATTEMPTS,
                        task.name,
                        e,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

/// Truncate to at most `max_bytes`, respecting UTF-8 boundaries
fn truncate_at_char_boundary(input: &str, max_bytes: usize) -> &str {
    if input.len() <= max_bytes {
        return input;
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    &input[..end]
}

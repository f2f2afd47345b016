//! Step generation via an OpenAI-compatible chat completions API
//!
//! Generation is best-effort: a missing API key, a transport failure, or an
//! unusable response all degrade to a deterministic local fallback so the
//! assistant keeps working offline.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const MODEL: &str = "gpt-3.5-turbo";
const MAX_TOKENS: u32 = 150;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const API_KEY_ENV: &str = "OPENAI_API_KEY";
const FALLBACK_STEP_COUNT: usize = 5;

#[derive(Debug, Error)]
enum GenerateError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Unusable completion: {0}")]
    Unusable(String),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Language-model-backed step generator with a local fallback
pub struct StepGenerator {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl StepGenerator {
    /// Create a generator using `OPENAI_API_KEY` from the environment
    pub fn new() -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        Self::with_config(DEFAULT_BASE_URL, api_key)
    }

    /// Create a generator against an explicit endpoint/key (used by tests)
    pub fn with_config(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Break `task` into short steps
    ///
    /// Never fails: API problems are logged and the fallback plan returned.
    pub async fn generate(&self, task: &str) -> Vec<String> {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => {
                tracing::info!("No API key configured, using fallback steps");
                return fallback_steps(task);
            }
        };

        match self.request_steps(api_key, task).await {
            Ok(steps) => steps,
            Err(e) => {
                tracing::warn!(error = %e, "Step generation failed, using fallback");
                fallback_steps(task)
            }
        }
    }

    async fn request_steps(&self, api_key: &str, task: &str) -> Result<Vec<String>, GenerateError> {
        let prompt = format!(
            "Break the following task into 5-8 short steps.\nTask: {}\nSteps:",
            task
        );
        let body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
        };

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(url = %url, "Requesting step breakdown");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api(status.as_u16(), error_text));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Unusable(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| GenerateError::Unusable("no choices in response".to_string()))?;

        let steps = parse_steps(&content);
        if steps.is_empty() {
            return Err(GenerateError::Unusable("completion held no steps".to_string()));
        }

        tracing::info!(count = steps.len(), "Generated step breakdown");
        Ok(steps)
    }
}

impl Default for StepGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Split completion text into trimmed steps, stripping list markers
pub fn parse_steps(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let line = line.strip_prefix('-').or_else(|| line.strip_prefix('*')).unwrap_or(line);

    // "1. step" / "2) step"
    let trimmed = line.trim_start_matches(|c: char| c.is_ascii_digit());
    let line = if trimmed.len() < line.len() {
        trimmed.strip_prefix('.').or_else(|| trimmed.strip_prefix(')')).unwrap_or(line)
    } else {
        line
    };

    line.trim()
}

/// Deterministic offline plan
pub fn fallback_steps(task: &str) -> Vec<String> {
    (1..=FALLBACK_STEP_COUNT)
        .map(|i| format!("Step {} for: {}", i, task))
        .collect()
}

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::warn;

use crate::config::DEFAULT_LLM_BASE_URL;
use crate::error::{AgentError, Result};

/// Thin client for any OpenAI-compatible `/chat/completions` endpoint
#[derive(Clone, Debug)]
pub struct OpenAIClient {
    api_key: Option<String>,
    base_url: String,
    max_retries: usize,
}

impl OpenAIClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            max_retries: 0,
        }
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    pub fn set_max_retries(&mut self, max_retries: usize) {
        self.max_retries = max_retries;
    }

    pub async fn chat_completion(&self, body: &Value, timeout: Duration) -> Result<Value> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AgentError::Config("GOOGLE_API_KEY is not set; cannot reach the model".to_string())
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AgentError::Unknown(format!("Failed to build HTTP client: {err}")))?;

        let mut attempt = 0;
        let mut backoff = Duration::from_millis(250);
        let request_url = build_chat_url(&self.base_url);

        loop {
            let response = client
                .post(&request_url)
                .bearer_auth(api_key)
                .header("Content-Type", "application/json")
                .json(body)
                .send()
                .await
                .map_err(transport_error)?;

            let status = response.status();
            let headers = response.headers().clone();
            let response_text = response.text().await.map_err(transport_error)?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_duration = headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(backoff);

                if attempt < self.max_retries {
                    warn!(attempt, "model rate limited, retrying");
                    tokio::time::sleep(retry_after_duration).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }

                return Err(AgentError::RateLimit {
                    retry_after: retry_after_duration.as_secs().max(1),
                });
            }

            if status.is_server_error() && attempt < self.max_retries {
                warn!(attempt, %status, "model returned server error, retrying");
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            let response_json: Value = match serde_json::from_str(&response_text) {
                Ok(value) => value,
                Err(_) if !status.is_success() => {
                    return Err(AgentError::Completion(format!(
                        "HTTP {} error: {}",
                        status, response_text
                    )))
                }
                Err(err) => {
                    return Err(AgentError::Completion(format!(
                        "Failed to parse JSON: {err}"
                    )))
                }
            };

            if let Some(error) = extract_api_error(&response_json) {
                return Err(AgentError::Completion(if status.is_success() {
                    format!("API error: {}", error)
                } else {
                    format!("HTTP {} error: {}", status, error)
                }));
            }

            if !status.is_success() {
                return Err(AgentError::Completion(format!(
                    "HTTP {} error: {}",
                    status, response_text
                )));
            }

            return Ok(response_json);
        }
    }
}

/// The client timeout bounds a single attempt; hitting it maps to `Timeout`.
fn transport_error(err: reqwest::Error) -> AgentError {
    if err.is_timeout() {
        AgentError::Timeout(format!("Model call timed out: {err}"))
    } else {
        AgentError::Http(err)
    }
}

/// Gemini's compatibility layer wraps errors in a one-element array.
fn extract_api_error(response: &Value) -> Option<String> {
    let error = match response {
        Value::Array(items) => items.first()?.get("error")?,
        other => other.get("error")?,
    };

    Some(
        error
            .get("message")
            .and_then(|value| value.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| error.to_string()),
    )
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    tools: Vec<Value>,
    tool_choice: Option<Value>,
    max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: Vec::new(),
            tool_choice: None,
            max_tokens: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<Value>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: Value) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if !self.tools.is_empty() {
            body["tools"] = Value::Array(self.tools);
        }

        if let Some(tool_choice) = self.tool_choice {
            body["tool_choice"] = tool_choice;
        }

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }
}

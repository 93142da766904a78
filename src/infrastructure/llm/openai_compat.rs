//! Chat provider for OpenAI-compatible `/chat/completions` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::retry::RetryPolicy;
use crate::domain::errors::LlmError;
use crate::domain::models::config::{redact_secret, LlmConfig, ProviderConfig};
use crate::domain::ports::{ChatMessage, ChatProvider};

/// Longest error body kept in an error value.
const MAX_ERROR_BODY: usize = 500;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP chat provider speaking the OpenAI wire format in JSON-object mode.
pub struct OpenAiCompatibleProvider {
    name: String,
    http_client: ReqwestClient,
    api_key: String,
    base_url: String,
    model: String,
    retry_policy: RetryPolicy,
}

impl OpenAiCompatibleProvider {
    /// Build a provider from its connection settings and the shared LLM knobs.
    pub fn new(
        name: impl Into<String>,
        provider: &ProviderConfig,
        llm: &LlmConfig,
    ) -> Result<Self, LlmError> {
        let name = name.into();
        let api_key = provider
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::InvalidResponse {
                provider: name.clone(),
                message: "missing API key".to_string(),
            })?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(llm.timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| LlmError::Network {
                provider: name.clone(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        debug!(
            provider = %name,
            model = %provider.model,
            base_url = %provider.base_url,
            api_key = %redact_secret(&api_key),
            "chat provider configured"
        );

        Ok(Self {
            name,
            http_client,
            api_key,
            base_url: provider.base_url.trim_end_matches('/').to_string(),
            model: provider.model.clone(),
            retry_policy: RetryPolicy::new(
                llm.max_retries,
                llm.initial_backoff_ms,
                llm.max_backoff_ms,
            ),
        })
    }

    /// Model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, LlmError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network {
                provider: self.name.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(self.status_error(status, body));
        }

        let parsed: ChatCompletionResponse =
            response.json().await.map_err(|e| LlmError::InvalidResponse {
                provider: self.name.clone(),
                message: e.to_string(),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::InvalidResponse {
                provider: self.name.clone(),
                message: "response contained no message content".to_string(),
            })
    }

    fn status_error(&self, status: StatusCode, body: String) -> LlmError {
        let body: String = body.chars().take(MAX_ERROR_BODY).collect();
        if status == StatusCode::TOO_MANY_REQUESTS {
            LlmError::RateLimited {
                provider: self.name.clone(),
                message: body,
            }
        } else {
            LlmError::Http {
                provider: self.name.clone(),
                status: status.as_u16(),
                body,
            }
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, messages), fields(provider = %self.name, model = %self.model))]
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, LlmError> {
        self.retry_policy
            .execute(|| self.send_request(messages, temperature))
            .await
    }
}

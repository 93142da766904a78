//! Chat-completion ports.
//!
//! A [`ChatProvider`] is one concrete backend. A [`ChatModel`] is what agents
//! call: a temperature-bound handle that may route across several providers.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::LlmError;

/// Chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions.
    System,
    /// Caller input.
    User,
    /// Model reply.
    Assistant,
}

/// One message of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// System message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// User message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A single chat-completion backend.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider label used in logs and errors.
    fn name(&self) -> &str;

    /// Run one completion and return the raw assistant text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, LlmError>;
}

/// Callable chat model handed to agents.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Complete `messages` and return the raw reply text.
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}

/// Produces chat models bound to a sampling temperature.
pub trait ChatModelFactory: Send + Sync {
    /// Chat model bound to `temperature`.
    fn get_chat_model(&self, temperature: f32) -> Arc<dyn ChatModel>;
}

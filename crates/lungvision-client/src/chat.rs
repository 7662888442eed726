//! Chat assistant conversation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::ApiClient;
use crate::error::ApiResult;

pub const WELCOME_MESSAGE: &str = "Hello! I'm LungVision AI. How can I help you today?";
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble connecting to the server.";

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn reply(&self, message: &str) -> ApiResult<String>;
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn reply(&self, message: &str) -> ApiResult<String> {
        self.chat(message).await
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// Message history, seeded with the welcome message.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::bot(WELCOME_MESSAGE)],
        }
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send one message and return the bot's reply.
    ///
    /// Blank input is ignored. A failed request still yields a reply: the
    /// fallback message.
    pub async fn send<B>(&mut self, backend: &B, input: &str) -> Option<&ChatMessage>
    where
        B: ChatBackend + ?Sized,
    {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage {
            sender: Sender::User,
            text: text.to_string(),
        });

        let reply = match backend.reply(text).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "Chat request failed");
                FALLBACK_REPLY.to_string()
            }
        };
        self.messages.push(ChatMessage::bot(reply));
        self.messages.last()
    }
}

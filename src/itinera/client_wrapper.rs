use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::itinera::error::LlmError;

/// A ClientWrapper is a wrapper around a specific cloud LLM service.
/// It provides a common interface to interact with the LLMs.
/// It does not keep track of the conversation, for that we use an LLMSession
/// which keeps the history of one agent and uses a ClientWrapper to talk to the LLM.
// src/itinera/client_wrapper.rs

/// Represents the possible roles for a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Role {
    // set by the developer to steer the model's responses
    System,
    // a message sent by a human user (or by the controller on its behalf)
    User,
    // lets the model know the content was generated as a response to a user message
    Assistant,
}

impl Role {
    /// Wire name used by OpenAI-compatible chat APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// How many tokens were spent on prompt vs. completion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

/// Represents a generic message to be sent to an LLM.
#[derive(Clone, Debug)]
pub struct Message {
    /// The role associated with the message.
    pub role: Role,
    /// The actual content of the message. Stored as `Arc<str>` so cloning history is cheap.
    pub content: Arc<str>,
}

impl Message {
    pub fn new(role: Role, content: impl AsRef<str>) -> Self {
        Message {
            role,
            content: Arc::from(content.as_ref()),
        }
    }

    pub fn system(content: impl AsRef<str>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl AsRef<str>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl AsRef<str>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Trait defining the interface to interact with various LLM services.
#[async_trait]
pub trait ClientWrapper: Send + Sync {
    /// Send a conversation to the LLM and get the assistant's reply.
    /// - `messages`: system instruction first, then the ordered conversation turns.
    /// - `max_output_tokens`: optional cap on the length of the completion.
    async fn send_message(
        &self,
        messages: &[Message],
        max_output_tokens: Option<usize>,
    ) -> Result<Message, LlmError>;

    /// Model identifier injected into each request.
    fn model_name(&self) -> &str;

    /// Hook to retrieve usage from the *last* send_message() call.
    /// Default impl reads the slot exposed by `usage_slot()`.
    async fn get_last_usage(&self) -> Option<TokenUsage> {
        match self.usage_slot() {
            Some(slot) => slot.lock().await.clone(),
            None => None,
        }
    }

    /// Wrappers that track usage return their slot here.
    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        None
    }
}

//! The `llm_session` module keeps the private chat memory of one agent.
//!
//! A session pairs a [`ClientWrapper`] with a system prompt and the ordered history of
//! user/assistant turns. Every call sends the system prompt followed by the whole history, so
//! the agent remembers everything it has said and heard during a planning session.
//!
//! **Key features:**
//! - **Context budget**: `would_exceed_budget` estimates the prompt size before a call so the
//!   owning agent can stop instead of overflowing the model's window.
//! - **Token tracking**: accumulates `input_tokens` & `output_tokens` reported by the client.
//!
//! ```rust
//! use std::sync::Arc;
//! use itinera::clients::openai::{Model, OpenAIClient};
//! use itinera::LLMSession;
//!
//! let client = OpenAIClient::new_with_model_enum("YOUR_OPENAI_KEY", Model::GPT4oMini);
//! let session = LLMSession::new(Arc::new(client), "You are a travel guide.".into(), 8_192);
//! assert_eq!(session.history_len(), 0);
//! assert!(!session.would_exceed_budget("Plan a weekend in Lisbon"));
//! ```

use std::sync::Arc;

use crate::itinera::client_wrapper::{ClientWrapper, Message, Role, TokenUsage};
use crate::itinera::error::LlmError;

/// A conversation session with an LLM:
///
/// - `client`: your `ClientWrapper` (e.g. `OpenAIClient`).
/// - `system_prompt`: the context-steering system message.
/// - `conversation_history`: all user & assistant messages (excluding system prompt).
/// - `max_tokens`: the context budget for this session.
pub struct LLMSession {
    client: Arc<dyn ClientWrapper>,
    system_prompt: Message,
    conversation_history: Vec<Message>,
    max_tokens: usize,
    total_input_tokens: usize,
    total_output_tokens: usize,
}

impl LLMSession {
    /// Creates a new `LLMSession` with the given client, system prompt and context budget.
    pub fn new(client: Arc<dyn ClientWrapper>, system_prompt: String, max_tokens: usize) -> Self {
        LLMSession {
            client,
            system_prompt: Message::system(system_prompt),
            conversation_history: Vec::new(),
            max_tokens,
            total_input_tokens: 0,
            total_output_tokens: 0,
        }
    }

    /// Appends a message to the history, sends system prompt + history to the client,
    /// records usage and appends the assistant's reply.
    ///
    /// On failure the pending message stays in history, mirroring what the agent was told.
    pub async fn send_message(
        &mut self,
        role: Role,
        content: String,
        max_output_tokens: Option<usize>,
    ) -> Result<Message, LlmError> {
        self.conversation_history.push(Message::new(role, content));

        let mut request = Vec::with_capacity(self.conversation_history.len() + 1);
        request.push(self.system_prompt.clone());
        request.extend(self.conversation_history.iter().cloned());

        let response = self
            .client
            .send_message(&request, max_output_tokens)
            .await?;

        if let Some(usage) = self.client.get_last_usage().await {
            self.total_input_tokens += usage.input_tokens;
            self.total_output_tokens += usage.output_tokens;
        }

        self.conversation_history.push(response.clone());
        Ok(response)
    }

    /// Record a message without calling the LLM.
    pub fn push_message(&mut self, role: Role, content: String) {
        self.conversation_history.push(Message::new(role, content));
    }

    /// True when sending `next` on top of the current history would reach the budget.
    pub fn would_exceed_budget(&self, next: &str) -> bool {
        let history: usize = self
            .conversation_history
            .iter()
            .map(estimate_message_token_count)
            .sum();
        let projected = estimate_message_token_count(&self.system_prompt)
            + history
            + estimate_token_count(next)
            + 1;
        projected >= self.max_tokens
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt.content
    }

    pub fn history(&self) -> &[Message] {
        &self.conversation_history
    }

    pub fn history_len(&self) -> usize {
        self.conversation_history.len()
    }

    pub fn client(&self) -> &Arc<dyn ClientWrapper> {
        &self.client
    }

    /// Returns the cumulative token usage reported by the client.
    pub fn token_usage(&self) -> TokenUsage {
        TokenUsage {
            input_tokens: self.total_input_tokens,
            output_tokens: self.total_output_tokens,
            total_tokens: self.total_input_tokens + self.total_output_tokens,
        }
    }

    pub fn get_max_tokens(&self) -> usize {
        self.max_tokens
    }
}

/// Estimates the number of tokens in a string.
/// Uses an approximate formula: one token per 4 characters.
pub(crate) fn estimate_token_count(text: &str) -> usize {
    (text.len() / 4).max(1)
}

/// Estimates the number of tokens in a Message, including role annotations.
fn estimate_message_token_count(message: &Message) -> usize {
    1 + estimate_token_count(&message.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    struct EchoClient {
        seen: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl ClientWrapper for EchoClient {
        async fn send_message(
            &self,
            messages: &[Message],
            _max_output_tokens: Option<usize>,
        ) -> Result<Message, LlmError> {
            self.seen.lock().await.push(messages.len());
            let last = messages.last().map(|m| m.content.to_string()).unwrap_or_default();
            Ok(Message::assistant(format!("echo: {}", last)))
        }

        fn model_name(&self) -> &str {
            "echo"
        }

        async fn get_last_usage(&self) -> Option<TokenUsage> {
            Some(TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            })
        }
    }

    #[tokio::test]
    async fn test_history_grows_and_system_prompt_is_sent_first() {
        let client = Arc::new(EchoClient {
            seen: Mutex::new(Vec::new()),
        });
        let mut session = LLMSession::new(client.clone(), "sys".into(), 1_000);

        session.send_message(Role::User, "one".into(), None).await.unwrap();
        let reply = session.send_message(Role::User, "two".into(), None).await.unwrap();

        assert_eq!(&*reply.content, "echo: two");
        assert_eq!(session.history_len(), 4);
        // system + 1 user, then system + user/assistant/user
        assert_eq!(*client.seen.lock().await, vec![2, 4]);
        assert_eq!(session.token_usage().total_tokens, 30);
    }

    #[test]
    fn test_budget_estimate() {
        let client = Arc::new(EchoClient {
            seen: Mutex::new(Vec::new()),
        });
        let session = LLMSession::new(client, "sys".into(), 10);
        assert!(!session.would_exceed_budget("short"));
        assert!(session.would_exceed_budget(&"x".repeat(400)));
    }
}
